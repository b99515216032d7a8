//! Concurrent readers/writers stress tests

mod common;

use common::{generate_files, populate, populated_catalog, EXTENSIONS};
use file_catalog::{Catalog, FileId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_4_readers_1_writer_never_see_mismatched_records() {
    let (catalog, _) = populated_catalog(1_000, 11);
    let catalog = Arc::new(catalog);
    let done = Arc::new(AtomicBool::new(false));
    let reads = Arc::new(AtomicUsize::new(0));

    let readers: Vec<_> = (0..4)
        .map(|reader_id| {
            let catalog = Arc::clone(&catalog);
            let done = Arc::clone(&done);
            let reads = Arc::clone(&reads);
            std::thread::spawn(move || {
                let mut round = reader_id;
                while !done.load(Ordering::Acquire) {
                    let ext = EXTENSIONS[round % EXTENSIONS.len()];
                    for file in catalog.query_by_extension_indexed(ext) {
                        assert_eq!(file.extension, ext, "record {} under wrong key", file.file_id);
                    }
                    for file in catalog.query_by_size_range_indexed(0, 2 * 1024 * 1024) {
                        assert!(file.file_size <= 2 * 1024 * 1024);
                    }
                    reads.fetch_add(1, Ordering::Relaxed);
                    round += 1;
                }
            })
        })
        .collect();

    let writer = {
        let catalog = Arc::clone(&catalog);
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            for (i, ext) in EXTENSIONS.iter().cycle().take(2_000).enumerate() {
                let name = format!("churn_{}", i);
                catalog
                    .add_file("/churn", &name, ext, (i as u64 + 1) * 100, "writer", "2024-1-1")
                    .unwrap();
                if i % 2 == 1 {
                    catalog.remove_file(&format!("/churn/churn_{}", i - 1)).unwrap();
                    catalog.remove_file(&format!("/churn/{}", name)).unwrap();
                }
            }
            done.store(true, Ordering::Release);
        })
    };

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert!(reads.load(Ordering::Relaxed) > 0);
    assert_eq!(catalog.total_files(), 1_000);
    assert!(catalog.query_by_owner_indexed("writer").is_empty());
    catalog.verify().unwrap();
}

#[test]
fn test_concurrent_writers_assign_unique_ids() {
    let catalog = Catalog::new();
    let per_thread = 250;

    let all_ids: Vec<FileId> = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let catalog = &catalog;
                s.spawn(move |_| {
                    (0..per_thread)
                        .map(|i| {
                            catalog
                                .add_file(
                                    &format!("/writer{}", t),
                                    &format!("f{}", i),
                                    ".bin",
                                    i as u64,
                                    "u",
                                    "t",
                                )
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    })
    .unwrap();

    let unique: HashSet<FileId> = all_ids.iter().copied().collect();
    assert_eq!(unique.len(), 8 * per_thread);
    assert_eq!(catalog.total_files(), 8 * per_thread);
    assert_eq!(catalog.next_file_id(), FileId::new(8 * per_thread as u64 + 1));
    catalog.verify().unwrap();
}

#[test]
fn test_mixed_workload_keeps_structures_consistent() {
    let catalog = Catalog::new();
    let files = generate_files(1_200, 5);
    let (first, second) = files.split_at(600);
    populate(&catalog, first);

    crossbeam::thread::scope(|s| {
        // Remove the first half while the second half is added
        s.spawn(|_| {
            for file in first {
                catalog.remove_file(&file.full_path()).unwrap();
            }
        });
        s.spawn(|_| populate(&catalog, second));

        for _ in 0..2 {
            s.spawn(|_| {
                for _ in 0..200 {
                    let ids = catalog.index().query_by_owner("admin");
                    assert!(ids.windows(2).all(|w| w[0] < w[1]));
                    for file in catalog.query_by_owner_indexed("admin") {
                        assert_eq!(file.owner, "admin");
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(catalog.total_files(), 600);
    for file in first {
        assert!(!catalog.exists(&file.full_path()));
    }
    for file in second {
        assert!(catalog.exists(&file.full_path()));
    }
    catalog.verify().unwrap();
}
