#![allow(dead_code)]

pub mod command;
pub mod file;

/// Id of the tree with no entries
pub const EMPTY_TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Id of the blob `"hello\n"`
pub const HELLO_BLOB_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

/// Id of the tree holding only `hello.txt` with `"hello\n"`
pub const HELLO_TREE_OID: &str = "aaa96ced2d9a1c8e72c56b253a0e2fe78393feb7";

/// Read a file below `.git`, trimmed
pub fn read_git_file(dir: &std::path::Path, relative: &str) -> String {
    let path = dir.join(".git").join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
        .trim()
        .to_string()
}

pub fn head_content(dir: &std::path::Path) -> String {
    read_git_file(dir, "HEAD")
}

/// Object files under `.git/objects`, as full ids
pub fn stored_object_ids(dir: &std::path::Path) -> Vec<String> {
    let objects = dir.join(".git").join("objects");
    let mut ids = walkdir::WalkDir::new(&objects)
        .min_depth(2)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(&objects).ok()?;
            let fanout = relative.parent()?.to_str()?;
            let rest = relative.file_name()?.to_str()?;
            Some(format!("{fanout}{rest}"))
        })
        .collect::<Vec<_>>();
    ids.sort();

    ids
}
