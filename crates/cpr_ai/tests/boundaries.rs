use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(p) = stack.pop() {
        let Ok(entries) = fs::read_dir(&p) else {
            continue;
        };
        for ent in entries.flatten() {
            let path = ent.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

#[test]
fn generation_never_touches_document_export() {
    // The generator only produces report data; layout and file output belong to the session.
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let files = collect_rs_files(&src_root);
    assert!(!files.is_empty());

    for f in files {
        let text = fs::read_to_string(&f).unwrap_or_default();
        for forbidden in ["cpr_core::layout", "DocumentWriter", "to_document_blocks"] {
            assert!(
                !text.contains(forbidden),
                "forbidden reference {forbidden} found in {}",
                f.display()
            );
        }
    }
}

#[test]
fn evidence_bytes_are_not_part_of_the_request() {
    let text = fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/report/mod.rs"),
    )
    .expect("read report module");
    assert!(!text.contains(".bytes()"));
}
