use llm_dump::output::{self, OutputFormat};
use llm_dump::{
    BinaryDetection, DumpError, ExtensionAllowlist, MarkdownDumpBuilder, OutputBlock,
    RepoDumpBuilder, SkipReason, dump_markdown, dump_repository, dump_repository_with,
};
use std::fs;
use tempfile::{TempDir, tempdir};

fn sample_repo() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("src/main.py"), "print('hello')").unwrap();
    fs::write(root.join("src/test.pyc"), "compiled").unwrap();
    fs::write(root.join("README.md"), "# README").unwrap();
    fs::write(root.join(".env"), "SECRET=123").unwrap();
    fs::write(root.join(".gitignore"), "\n*.pyc\n.env\n").unwrap();
    dir
}

/// main -> second_file, subfolder/third_file, fourth_file; second -> main, third.
fn sample_vault() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("main.md"),
        "# Main File\nThis is a test file with multiple links:\n[[second_file]]\n\
         [[subfolder/third_file|Third]]\n[External Link](https://example.com)\n\
         [[fourth_file#section]]\n",
    )
    .unwrap();
    fs::write(
        root.join("second_file.md"),
        "# Second File\nThis links back to [[main]] and to [[subfolder/third_file]]\n",
    )
    .unwrap();
    fs::create_dir(root.join("subfolder")).unwrap();
    fs::write(
        root.join("subfolder/third_file.md"),
        "# Third File\nThis is in a subfolder and links to [[../main]]\n",
    )
    .unwrap();
    fs::write(
        root.join("fourth_file.md"),
        "# Fourth File\nThis is the last file with no links\n",
    )
    .unwrap();
    dir
}

#[test]
fn repository_dump_respects_gitignore() {
    let dir = sample_repo();
    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();

    assert!(matches!(dump.blocks[0], OutputBlock::Tree { .. }));
    assert_eq!(
        dump.file_paths(),
        vec!["src/main.py", ".gitignore", "README.md"]
    );
    let tree = dump.tree().unwrap();
    assert!(tree.contains("main.py"));
    assert!(!tree.contains("test.pyc"));
    assert!(!tree.contains(".env"));
    assert!(dump.skipped.is_empty());
}

#[test]
fn repository_dump_excludes_log_files_everywhere() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
    fs::write(dir.path().join("debug.log"), "noise").unwrap();
    fs::write(dir.path().join("app.rs"), "fn app() {}").unwrap();
    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    assert!(!dump.tree().unwrap().contains("debug.log"));
    assert!(!dump.file_paths().contains(&"debug.log"));
    assert!(dump.file_paths().contains(&"app.rs"));
}

#[test]
fn repository_dump_lists_each_file_once() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("a/b/one.txt"), "1").unwrap();
    fs::write(root.join("a/two.txt"), "2").unwrap();
    fs::write(root.join("three.txt"), "3").unwrap();
    let dump = dump_repository(RepoDumpBuilder::new(root).build()).unwrap();
    assert_eq!(
        dump.file_paths(),
        vec!["a/b/one.txt", "a/two.txt", "three.txt"]
    );
}

#[test]
fn git_directory_is_never_dumped() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("src/main.py"), "print('hello')").unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(
        root.join(".git/config"),
        "[core]\n\trepositoryformatversion = 0",
    )
    .unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();

    let dump = dump_repository(RepoDumpBuilder::new(root).build()).unwrap();
    let text = output::format_dump(&dump, OutputFormat::Text).unwrap();
    assert!(!text.contains(".git"));
    assert!(!text.contains("repositoryformatversion"));
    assert!(text.contains("print('hello')"));
}

#[test]
fn binary_files_stay_in_tree_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bin.dat"), vec![0, 1, 2, 3]).unwrap();
    fs::write(dir.path().join("latin1.txt"), vec![0xff, 0xfe, 0x41]).unwrap();
    fs::write(dir.path().join("ok.txt"), "fine").unwrap();

    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    let tree = dump.tree().unwrap();
    assert!(tree.contains("bin.dat"));
    assert!(tree.contains("latin1.txt"));
    assert_eq!(dump.file_paths(), vec!["ok.txt"]);
    assert_eq!(dump.skipped.len(), 2);
    assert_eq!(dump.skipped[0].path, "bin.dat");
    assert_eq!(dump.skipped[0].reason, SkipReason::Binary);
    assert_eq!(dump.skipped[1].reason, SkipReason::NotUtf8);
}

#[test]
fn binary_detection_none_still_rejects_invalid_utf8() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("nul.txt"), "a\0b").unwrap();
    fs::write(dir.path().join("bad.txt"), vec![0xc3, 0x28]).unwrap();
    let options = RepoDumpBuilder::new(dir.path())
        .binary_detection(BinaryDetection::None)
        .build();
    let dump = dump_repository(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["nul.txt"]);
}

#[test]
fn custom_classifier_is_used() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep.rs"), "fn keep() {}").unwrap();
    fs::write(dir.path().join("data.csv"), "a,b").unwrap();
    let allow = ExtensionAllowlist::new(["rs"]);
    let dump = dump_repository_with(RepoDumpBuilder::new(dir.path()).build(), &allow).unwrap();
    assert_eq!(dump.file_paths(), vec!["keep.rs"]);
    assert!(dump.tree().unwrap().contains("data.csv"));
}

#[test]
fn previous_output_inside_root_is_not_dumped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let out = dir.path().join("dump.txt");
    fs::write(&out, "stale output").unwrap();
    let options = RepoDumpBuilder::new(dir.path()).exclude_path(&out).build();
    let dump = dump_repository(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["a.txt"]);
    assert!(!dump.tree().unwrap().contains("dump.txt"));
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = dump_repository(RepoDumpBuilder::new(&missing).build()).unwrap_err();
    assert!(matches!(err, DumpError::InputNotFound { .. }));

    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    let err = dump_repository(RepoDumpBuilder::new(&file).build()).unwrap_err();
    assert!(matches!(err, DumpError::InvalidInput { .. }));
}

#[cfg(unix)]
#[test]
fn unlistable_root_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("a.txt"), "a").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Permission bits do not bind a privileged user.
    let listable = fs::read_dir(&locked).is_ok();
    let result = dump_repository(RepoDumpBuilder::new(&locked).build());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if listable {
        return;
    }
    assert!(matches!(result, Err(DumpError::Io { .. })));
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ok.txt"), "fine").unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("broken.txt"))
        .unwrap();

    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(dump.tree(), Some("├── broken.txt\n└── ok.txt"));
    assert_eq!(dump.file_paths(), vec!["ok.txt"]);
    assert_eq!(dump.skipped.len(), 1);
    assert_eq!(dump.skipped[0].path, "broken.txt");
    assert!(matches!(dump.skipped[0].reason, SkipReason::Unreadable(_)));
}

#[test]
fn text_output_format() {
    let dir = sample_repo();
    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    let out = dir.path().join("output.txt");
    output::write_dump(&dump, OutputFormat::Text, &out).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("File Tree Structure:\n├── src\n"));
    assert!(content.contains(
        "--- Start of src/main.py ---\nprint('hello')\n--- End of src/main.py ---\n\n"
    ));
    assert!(content.contains("# README"));
    assert!(!content.contains("SECRET=123"));
}

#[test]
fn json_output_includes_skipped_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bin.dat"), vec![0, 1]).unwrap();
    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    let json = output::format_dump(&dump, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["blocks"][0]["kind"], "tree");
    assert_eq!(value["skipped"][0]["path"], "bin.dat");
    assert_eq!(value["skipped"][0]["reason"], "binary");
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let dump = dump_repository(RepoDumpBuilder::new(dir.path()).build()).unwrap();
    let err = output::write_dump(&dump, OutputFormat::Text, dir.path().join("no/such/dir.txt"))
        .unwrap_err();
    assert!(matches!(err, DumpError::Output { .. }));
}

#[test]
fn markdown_single_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("single.md"), "# Single File\nNo links here.").unwrap();
    let dump = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("single.md")).build())
        .unwrap();
    assert_eq!(dump.file_paths(), vec!["single.md"]);
    assert!(dump.tree().is_none());
}

#[test]
fn markdown_follows_links_depth_first() {
    let dir = sample_vault();
    let dump = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("main.md")).build())
        .unwrap();
    assert_eq!(
        dump.file_paths(),
        vec![
            "main.md",
            "second_file.md",
            "subfolder/third_file.md",
            "fourth_file.md"
        ]
    );
    let depths: Vec<_> = dump.visits.iter().map(|v| v.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1]);
    assert_eq!(dump.visits[0].via, None);
    assert_eq!(dump.visits[1].via.as_deref(), Some("second_file"));
}

#[test]
fn markdown_depth_one_reaches_direct_links() {
    let dir = sample_vault();
    let options = MarkdownDumpBuilder::new(dir.path().join("main.md"))
        .max_depth(1)
        .build();
    let dump = dump_markdown(options).unwrap();
    assert_eq!(
        dump.file_paths(),
        vec![
            "main.md",
            "second_file.md",
            "subfolder/third_file.md",
            "fourth_file.md"
        ]
    );
    assert!(dump.visits.iter().all(|v| v.depth <= 1));
}

#[test]
fn markdown_depth_zero_is_seed_only() {
    let dir = sample_vault();
    let options = MarkdownDumpBuilder::new(dir.path().join("main.md"))
        .max_depth(0)
        .build();
    let dump = dump_markdown(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["main.md"]);
}

#[test]
fn markdown_two_file_cycle() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "[[b]]").unwrap();
    fs::write(dir.path().join("b.md"), "[[a]]").unwrap();
    let dump = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("a.md")).build()).unwrap();
    assert_eq!(dump.file_paths(), vec!["a.md", "b.md"]);
}

#[test]
fn markdown_three_file_cycle_terminates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "[[b]]").unwrap();
    fs::write(dir.path().join("b.md"), "[[c]]").unwrap();
    fs::write(dir.path().join("c.md"), "[[a]]").unwrap();
    let options = MarkdownDumpBuilder::new(dir.path().join("a.md"))
        .max_depth(10)
        .build();
    let dump = dump_markdown(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["a.md", "b.md", "c.md"]);
}

#[test]
fn markdown_standard_link_ignores_fragment() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("index.md"), "[text](./sub/doc.md#section)").unwrap();
    fs::write(dir.path().join("sub/doc.md"), "# Doc").unwrap();
    let dump =
        dump_markdown(MarkdownDumpBuilder::new(dir.path().join("index.md")).build()).unwrap();
    assert_eq!(dump.file_paths(), vec!["index.md", "sub/doc.md"]);
}

#[test]
fn markdown_without_base_folder_uses_seed_folder() {
    let dir = tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("sub")).unwrap();
    fs::write(
        docs.join("main.md"),
        "# Main File\nThis is a test file with a link to [[sub/other]]\n",
    )
    .unwrap();
    fs::write(docs.join("sub/other.md"), "# Other File\nThis is another file.\n").unwrap();

    let dump = dump_markdown(MarkdownDumpBuilder::new(docs.join("main.md")).build()).unwrap();
    let out = dir.path().join("output.md");
    output::write_dump(&dump, OutputFormat::Text, &out).unwrap();
    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let main_idx = lines
        .iter()
        .position(|l| *l == "--- Start of main.md ---")
        .unwrap();
    let other_idx = lines
        .iter()
        .position(|l| *l == "--- Start of sub/other.md ---")
        .unwrap();
    assert!(main_idx < other_idx);
    assert!(content.contains("# Other File"));
}

#[test]
fn markdown_base_folder_resolves_vault_links() {
    let dir = tempdir().unwrap();
    let vault = dir.path();
    fs::create_dir_all(vault.join("daily")).unwrap();
    fs::create_dir_all(vault.join("projects")).unwrap();
    fs::write(vault.join("daily/today.md"), "Working on [[projects/alpha]]").unwrap();
    fs::write(vault.join("projects/alpha.md"), "# Alpha").unwrap();

    let options = MarkdownDumpBuilder::new(vault.join("daily/today.md"))
        .base_folder(Some(vault.to_path_buf()))
        .build();
    let dump = dump_markdown(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["daily/today.md", "projects/alpha.md"]);
}

#[test]
fn markdown_unreadable_link_target_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.md"), "![logo](logo.png) [[next]]").unwrap();
    fs::write(dir.path().join("logo.png"), vec![0x89, b'P', b'N', b'G', 0, 0]).unwrap();
    fs::write(dir.path().join("next.md"), "next").unwrap();
    let dump =
        dump_markdown(MarkdownDumpBuilder::new(dir.path().join("index.md")).build()).unwrap();
    assert_eq!(dump.file_paths(), vec!["index.md", "next.md"]);
    assert_eq!(dump.skipped.len(), 1);
    assert_eq!(dump.skipped[0].path, "logo.png");
}

#[cfg(unix)]
#[test]
fn markdown_linked_file_read_error_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.md"), "[[locked]] [[next]]").unwrap();
    fs::write(dir.path().join("locked.md"), "secret").unwrap();
    fs::write(dir.path().join("next.md"), "next").unwrap();
    let locked = dir.path().join("locked.md");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let readable = fs::read(&locked).is_ok();
    let result = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("index.md")).build());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    if readable {
        return;
    }
    let dump = result.unwrap();
    assert_eq!(dump.file_paths(), vec!["index.md", "next.md"]);
    assert_eq!(dump.skipped.len(), 1);
    assert_eq!(dump.skipped[0].path, "locked.md");
    assert!(matches!(dump.skipped[0].reason, SkipReason::Unreadable(_)));
}

#[test]
fn markdown_titles_with_colons_are_notes() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("a.md"),
        "[[Meeting: notes]] [[Re:Design]] [site](https://example.com)",
    )
    .unwrap();
    fs::write(dir.path().join("Meeting: notes.md"), "m").unwrap();
    fs::write(dir.path().join("Re:Design.md"), "r").unwrap();
    let dump = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("a.md")).build()).unwrap();
    assert_eq!(dump.file_paths(), vec!["a.md", "Meeting: notes.md", "Re:Design.md"]);
}

#[test]
fn markdown_first_route_wins_over_shallower_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "[[b]] [[c]]").unwrap();
    fs::write(dir.path().join("b.md"), "[[c]]").unwrap();
    fs::write(dir.path().join("c.md"), "[[d]]").unwrap();
    fs::write(dir.path().join("d.md"), "d").unwrap();
    let options = MarkdownDumpBuilder::new(dir.path().join("a.md"))
        .max_depth(2)
        .build();
    let dump = dump_markdown(options).unwrap();
    assert_eq!(dump.file_paths(), vec!["a.md", "b.md", "c.md"]);
    let depths: Vec<usize> = dump.visits.iter().map(|v| v.depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
}

#[test]
fn markdown_seed_without_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.md"), "# Main").unwrap();
    let dump = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("main")).build()).unwrap();
    assert_eq!(dump.file_paths(), vec!["main.md"]);
}

#[test]
fn markdown_missing_seed_is_fatal() {
    let dir = tempdir().unwrap();
    let err = dump_markdown(MarkdownDumpBuilder::new(dir.path().join("ghost.md")).build())
        .unwrap_err();
    assert!(matches!(err, DumpError::InputNotFound { .. }));
}

#[test]
fn markdown_bad_base_folder_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "a").unwrap();
    let options = MarkdownDumpBuilder::new(dir.path().join("a.md"))
        .base_folder(Some(dir.path().join("a.md")))
        .build();
    let err = dump_markdown(options).unwrap_err();
    assert!(matches!(err, DumpError::InvalidInput { .. }));
}
