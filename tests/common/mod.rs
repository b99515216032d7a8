//! Shared fixtures: a seeded synthetic file population

#![allow(dead_code)]

use file_catalog::{Catalog, FileId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const EXTENSIONS: [&str; 7] = [".jpg", ".png", ".pdf", ".txt", ".doc", ".mp4", ".mp3"];
pub const OWNERS: [&str; 5] = ["user1", "user2", "user3", "admin", "guest"];
pub const DIRECTORIES: [&str; 5] = [
    "/home/user1",
    "/home/user2",
    "/documents",
    "/pictures",
    "/videos",
];

pub const MIN_SIZE: u64 = 1024;
pub const MAX_SIZE: u64 = 10 * 1024 * 1024;

/// One file to be added to a catalog
#[derive(Debug, Clone)]
pub struct SyntheticFile {
    pub dir: &'static str,
    pub name: String,
    pub extension: &'static str,
    pub size: u64,
    pub owner: &'static str,
    pub create_time: String,
}

impl SyntheticFile {
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.dir, self.name)
    }
}

/// Generate `count` files deterministically from `seed`
///
/// Names are unique across the whole set.
pub fn generate_files(count: usize, seed: u64) -> Vec<SyntheticFile> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let extension = EXTENSIONS[rng.gen_range(0..EXTENSIONS.len())];
            SyntheticFile {
                dir: DIRECTORIES[rng.gen_range(0..DIRECTORIES.len())],
                name: format!("file_{}{}", i, extension),
                extension,
                size: rng.gen_range(MIN_SIZE..=MAX_SIZE),
                owner: OWNERS[rng.gen_range(0..OWNERS.len())],
                create_time: format!("2024-{}-{}", i % 12 + 1, i % 28 + 1),
            }
        })
        .collect()
}

/// Add every file to `catalog`, returning the assigned identifiers in order
pub fn populate(catalog: &Catalog, files: &[SyntheticFile]) -> Vec<FileId> {
    files
        .iter()
        .map(|f| {
            catalog
                .add_file(f.dir, &f.name, f.extension, f.size, f.owner, &f.create_time)
                .expect("synthetic file should be accepted")
        })
        .collect()
}

/// A catalog holding `count` synthetic files
pub fn populated_catalog(count: usize, seed: u64) -> (Catalog, Vec<SyntheticFile>) {
    let catalog = Catalog::new();
    let files = generate_files(count, seed);
    populate(&catalog, &files);
    (catalog, files)
}
