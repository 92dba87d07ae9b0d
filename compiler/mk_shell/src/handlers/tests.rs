#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use std::sync::Arc;

use chrono::NaiveDate;
use mk_find::{EntryKind, FileTree, FindIndex, IndexOptions};
use mk_ir::Value;
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{shell, MockShellExecutor, StubIndex};

const ROT13: &str = "echo $(1) | tr 'a-zA-Z' 'n-za-mN-ZA-M'";
const ASSETS: &str = "if [ -d $(D) ] ; then cd $(C) ; find ./ -not -name '.*' -and -type f -and -not -type l ; fi";
const JAVA: &str = r#"cd $(C) ; find -L $(R) -name "*.java" -and -not -name ".*""#;
const LEAVES: &str = "build/tools/findleaves.py --prune=$(OUT) --prune=.repo --prune=.git $(S) Android.mk";

fn tree_index() -> Arc<StubIndex> {
    let index = StubIndex::new(&[
        "assets/font.ttf",
        "assets/img/icon.png",
        "assets/.hidden",
        "pkg/src/com/Foo.java",
        "pkg/src/com/res/logo.png",
        "pkg/gen/Gen.java",
        "a/Android.mk",
        "b/sub/Android.mk",
        "out/x/Android.mk",
    ]);
    index.init(&IndexOptions::with_leaf_names(["Android.mk"]));
    index
}

fn as_index(stub: &Arc<StubIndex>) -> Arc<dyn FindIndex> {
    stub.clone()
}

fn resolved(template: &str, vars: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in vars {
        text = text.replace(&format!("$({name})"), value);
    }
    text
}

// Rotation

#[test]
fn rot13_rotates_within_case() {
    assert_eq!(rot13("Hello"), "Uryyb");
    assert_eq!(rot13("Uryyb"), "Hello");
    assert_eq!(rot13("abc-XYZ 09"), "nop-KLM 09");
    assert_eq!(rot13("été"), "égé");
}

#[test]
fn rot13_node_echoes_words() {
    let shell = shell(ROT13);
    let handler = Rot13::new(Value::param(1));
    let mut exec = MockShellExecutor::new().param(1, "  Hello   world\n");
    let mut out = String::new();
    handler.eval(&shell, &mut out, &mut exec).unwrap();
    assert_eq!(out, "Uryyb jbeyq");
    assert!(exec.scripts.is_empty());
}

#[test]
fn rot13_runs_shell_on_metacharacters() {
    let shell = shell(ROT13);
    let handler = Rot13::new(Value::param(1));
    let script = "echo a*b | tr 'a-zA-Z' 'n-za-mN-ZA-M'";
    let mut exec = MockShellExecutor::new()
        .param(1, "a*b")
        .shell_output(script, "n*o");
    let mut out = String::new();
    handler.eval(&shell, &mut out, &mut exec).unwrap();
    assert_eq!(out, "n*o");
    assert_eq!(exec.scripts, vec![script.to_string()]);
}

#[test]
fn rot13_runs_shell_when_first_word_is_an_echo_option() {
    let shell = shell(ROT13);
    let handler = Rot13::new(Value::param(1));
    for (value, printed) in [("-n Hello", "Uryyb"), ("-e a", "n"), ("-x y", "-k l")] {
        let script = resolved(ROT13, &[("1", value)]);
        let mut exec = MockShellExecutor::new()
            .param(1, value)
            .shell_output(&script, printed);
        let mut out = String::new();
        handler.eval(&shell, &mut out, &mut exec).unwrap();
        assert_eq!(out, printed, "value {value:?}");
        assert_eq!(exec.scripts, vec![script]);
    }
}

#[test]
fn rot13_keeps_dashes_after_the_first_word() {
    let handler = Rot13::new(Value::param(1));
    let mut exec = MockShellExecutor::new().param(1, "Hello -n");
    let mut out = String::new();
    handler.eval(&shell(ROT13), &mut out, &mut exec).unwrap();
    assert_eq!(out, "Uryyb -a");
    assert!(exec.scripts.is_empty());
}

#[test]
fn rot13_splits_only_where_the_shell_does() {
    let handler = Rot13::new(Value::param(1));
    let mut exec = MockShellExecutor::new().param(1, "ab\x0Ccd\rx\ty");
    let mut out = String::new();
    handler.eval(&shell(ROT13), &mut out, &mut exec).unwrap();
    assert_eq!(out, "no\x0Cpq\rk l");
}

#[test]
fn rot13_propagates_resolution_failure() {
    let handler = Rot13::new(Value::param(1));
    let mut exec = MockShellExecutor::new();
    let result = handler.eval(&shell(ROT13), &mut String::new(), &mut exec);
    assert!(result.is_err());
}

// Date

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn date(format: &str, ts: chrono::NaiveDateTime) -> String {
    let mut out = String::new();
    ShellDate::new(ts, format).eval(&mut out).unwrap();
    out
}

#[test]
fn date_formats_known_directives() {
    let ts = at(2024, 3, 5, 7, 4, 9);
    assert_eq!(date("%Y-%m-%d", ts), "2024-03-05");
    assert_eq!(date("%H:%M:%S", ts), "07:04:09");
    assert_eq!(date("%Y%m%d%H%M", ts), "202403050704");
    assert_eq!(date("%b %d", ts), "Mar 05");
}

#[test]
fn date_hour_k_is_space_padded() {
    assert_eq!(date("[%k]", at(2024, 3, 5, 7, 0, 0)), "[ 7]");
    assert_eq!(date("[%k]", at(2024, 3, 5, 23, 0, 0)), "[23]");
}

#[test]
fn date_keeps_unknown_text() {
    let ts = at(2024, 3, 5, 7, 4, 9);
    assert_eq!(date("%j %s %%", ts), "%j %s %%");
    assert_eq!(date("build-%Y%", ts), "build-2024%");
    assert_eq!(date("v1.2", ts), "v1.2");
}

#[test]
fn translate_merges_literals() {
    let items = translate_format("a%qb%Yc");
    assert_eq!(items.len(), 3);
}

// Directory listing

#[test]
fn find_in_dir_answers_from_index() {
    let stub = tree_index();
    let handler = FindInDir::new(as_index(&stub), Value::var("D"), None);
    let mut exec = MockShellExecutor::new().var("D", " assets ");
    let mut out = String::new();
    handler.eval(&shell(ASSETS), &mut out, &mut exec).unwrap();
    assert_eq!(out, "./font.ttf ./img/icon.png");
    assert!(exec.scripts.is_empty());
}

#[test]
fn find_in_dir_compares_distinct_references_by_content() {
    let stub = tree_index();
    let handler = FindInDir::new(as_index(&stub), Value::var("D"), Some(Value::var("C")));

    let mut exec = MockShellExecutor::new().var("D", "assets").var("C", "assets ");
    let mut out = String::new();
    handler.eval(&shell(ASSETS), &mut out, &mut exec).unwrap();
    assert_eq!(out, "./font.ttf ./img/icon.png");

    let script = resolved(ASSETS, &[("D", "assets"), ("C", "pkg")]);
    let mut exec = MockShellExecutor::new()
        .var("D", "assets")
        .var("C", "pkg")
        .shell_output(&script, "./src/com/Foo.java");
    let mut out = String::new();
    handler.eval(&shell(ASSETS), &mut out, &mut exec).unwrap();
    assert_eq!(out, "./src/com/Foo.java");
    assert_eq!(exec.scripts, vec![script]);
}

#[test]
fn find_in_dir_falls_back_on_unsafe_paths() {
    let stub = tree_index();
    let handler = FindInDir::new(as_index(&stub), Value::var("D"), Some(Value::var("C")));
    for dir in ["../assets", "/abs", "a b", "$(X)", ""] {
        let script = resolved(ASSETS, &[("D", dir), ("C", dir)]);
        let mut exec = MockShellExecutor::new()
            .var("D", dir)
            .var("C", dir)
            .shell_output(&script, "from-shell");
        let mut out = String::new();
        handler.eval(&shell(ASSETS), &mut out, &mut exec).unwrap();
        assert_eq!(out, "from-shell", "dir {dir:?}");
    }
}

#[test]
fn find_in_dir_falls_back_when_index_not_ready() {
    let stub = tree_index();
    stub.set_ready(false);
    let handler = FindInDir::new(as_index(&stub), Value::var("D"), None);
    let script = resolved(ASSETS, &[("D", "assets"), ("C", "assets")]);
    let shell = shell(&ASSETS.replace("$(C)", "$(D)"));
    let mut exec = MockShellExecutor::new()
        .var("D", "assets")
        .shell_output(&script, "slow");
    let mut out = String::new();
    handler.eval(&shell, &mut out, &mut exec).unwrap();
    assert_eq!(out, "slow");

    stub.set_ready(true);
    let mut out = String::new();
    handler.eval(&shell, &mut out, &mut exec).unwrap();
    assert_eq!(out, "./font.ttf ./img/icon.png");
    assert_eq!(exec.scripts.len(), 1);
}

#[test]
fn directory_queries_run_shell_through_symlinked_dirs() {
    let tree = FileTree::from_entries([
        ("real/font.ttf", EntryKind::File),
        ("assets", EntryKind::Symlink),
    ]);
    let stub = StubIndex::with_tree(tree);

    let handler = FindInDir::new(as_index(&stub), Value::var("D"), None);
    let shell_text = ASSETS.replace("$(C)", "$(D)");
    let script = resolved(&shell_text, &[("D", "assets")]);
    let mut exec = MockShellExecutor::new()
        .var("D", "assets")
        .shell_output(&script, "./font.ttf");
    let mut out = String::new();
    handler.eval(&shell(&shell_text), &mut out, &mut exec).unwrap();
    assert_eq!(out, "./font.ttf");
    assert_eq!(exec.scripts, vec![script]);

    let handler = FindJavaResources::new(as_index(&stub), vec![Value::var("D")]);
    let mut exec = MockShellExecutor::new()
        .var("D", "assets")
        .shell_output("cd assets && find", "./font.ttf");
    let mut out = String::new();
    handler
        .eval(&shell("cd $(D) && find"), &mut out, &mut exec)
        .unwrap();
    assert_eq!(out, "./font.ttf");
}

// Extension search

fn java_handler(index: Arc<dyn FindIndex>) -> FindExtFilesUnder {
    FindExtFilesUnder::new(index, Value::var("C"), Value::var("R"), ".java")
}

#[test]
fn ext_search_concatenates_roots() {
    let stub = tree_index();
    let handler = java_handler(as_index(&stub));
    let mut exec = MockShellExecutor::new().var("C", "pkg").var("R", " src  gen ");
    let mut out = String::from("prefix:");
    handler.eval(&shell(JAVA), &mut out, &mut exec).unwrap();
    assert_eq!(out, "prefix:src/com/Foo.java gen/Gen.java");
}

#[test]
fn ext_search_with_parent_root_matches_shell() {
    let stub = tree_index();
    let handler = java_handler(as_index(&stub));
    let script = resolved(JAVA, &[("C", "pkg"), ("R", "src ../x")]);
    let mut exec = MockShellExecutor::new()
        .var("C", "pkg")
        .var("R", "src ../x")
        .shell_output(&script, "src/com/Foo.java ../x/Y.java");
    let mut out = String::new();
    handler.eval(&shell(JAVA), &mut out, &mut exec).unwrap();
    assert_eq!(out, "src/com/Foo.java ../x/Y.java");
    assert_eq!(exec.scripts, vec![script]);
}

#[test]
fn ext_search_discards_partial_answers() {
    let tree = FileTree::from_entries([
        ("pkg/src/A.java", EntryKind::File),
        ("pkg/linked/B.java", EntryKind::File),
        ("pkg/linked/alias", EntryKind::Symlink),
    ]);
    let stub = StubIndex::with_tree(tree);
    let handler = java_handler(as_index(&stub));
    let script = resolved(JAVA, &[("C", "pkg"), ("R", "src linked")]);
    let mut exec = MockShellExecutor::new()
        .var("C", "pkg")
        .var("R", "src linked")
        .shell_output(&script, "src/A.java linked/B.java");
    let mut out = String::new();
    handler.eval(&shell(JAVA), &mut out, &mut exec).unwrap();
    assert_eq!(out, "src/A.java linked/B.java");
}

#[test]
fn ext_search_without_roots_runs_shell() {
    let stub = tree_index();
    let handler = java_handler(as_index(&stub));
    let script = resolved(JAVA, &[("C", "pkg"), ("R", "")]);
    let mut exec = MockShellExecutor::new()
        .var("C", "pkg")
        .var("R", "")
        .shell_output(&script, "");
    let mut out = String::new();
    handler.eval(&shell(JAVA), &mut out, &mut exec).unwrap();
    assert_eq!(exec.scripts, vec![script]);
}

// Java resources

#[test]
fn java_resources_join_dir_parts() {
    let stub = tree_index();
    let dir = vec![
        Value::var("T"),
        Value::var("L"),
        Value::literal("/"),
        Value::var("D"),
    ];
    let handler = FindJavaResources::new(as_index(&stub), dir);
    let mut exec = MockShellExecutor::new()
        .var("T", "")
        .var("L", "pkg")
        .var("D", "src");
    let mut out = String::new();
    handler
        .eval(&shell("cd $(T)$(L)/$(D) && find"), &mut out, &mut exec)
        .unwrap();
    assert_eq!(out, "./com/res/logo.png");
}

#[test]
fn java_resources_fall_back_on_absolute_dir() {
    let stub = tree_index();
    let handler = FindJavaResources::new(
        as_index(&stub),
        vec![Value::var("T"), Value::literal("/"), Value::var("D")],
    );
    let mut exec = MockShellExecutor::new()
        .var("T", "/top")
        .var("D", "src")
        .shell_output("cd /top/src && find", "./x.png");
    let mut out = String::new();
    handler
        .eval(&shell("cd $(T)/$(D) && find"), &mut out, &mut exec)
        .unwrap();
    assert_eq!(out, "./x.png");
}

// Leaf search

fn leaves_handler(index: Arc<dyn FindIndex>) -> FindLeaves {
    FindLeaves::new(
        index,
        vec![
            Value::var("OUT"),
            Value::literal(".repo"),
            Value::literal(".git"),
        ],
        Value::var("S"),
        "Android.mk",
        -1,
    )
}

#[test]
fn leaves_over_several_dirs() {
    let stub = tree_index();
    let handler = leaves_handler(as_index(&stub));
    let mut exec = MockShellExecutor::new().var("OUT", "out").var("S", "a b");
    let mut out = String::new();
    handler.eval(&shell(LEAVES), &mut out, &mut exec).unwrap();
    assert_eq!(out, "a/Android.mk b/sub/Android.mk");
}

#[test]
fn leaves_prune_output_dir() {
    let stub = tree_index();
    let handler = leaves_handler(as_index(&stub));
    let mut exec = MockShellExecutor::new().var("OUT", "out").var("S", ".");
    let mut out = String::new();
    handler.eval(&shell(LEAVES), &mut out, &mut exec).unwrap();
    assert_eq!(out, "./a/Android.mk ./b/sub/Android.mk");
}

#[test]
fn leaves_fall_back_when_leaf_index_not_ready() {
    let stub = tree_index();
    stub.leaves_ready
        .store(false, std::sync::atomic::Ordering::SeqCst);
    let handler = leaves_handler(as_index(&stub));
    let script = resolved(LEAVES, &[("OUT", "out"), ("S", "a")]);
    let mut exec = MockShellExecutor::new()
        .var("OUT", "out")
        .var("S", "a")
        .shell_output(&script, "a/Android.mk");
    let mut out = String::new();
    handler.eval(&shell(LEAVES), &mut out, &mut exec).unwrap();
    assert_eq!(out, "a/Android.mk");
    assert_eq!(exec.scripts, vec![script]);
}

#[test]
fn leaves_fall_back_on_parent_dir_or_split_prune() {
    let stub = tree_index();
    let handler = leaves_handler(as_index(&stub));
    for (out_dir, dirs) in [("out", "a ../b"), ("my out", "a")] {
        let script = resolved(LEAVES, &[("OUT", out_dir), ("S", dirs)]);
        let mut exec = MockShellExecutor::new()
            .var("OUT", out_dir)
            .var("S", dirs)
            .shell_output(&script, "from-shell");
        let mut out = String::new();
        handler.eval(&shell(LEAVES), &mut out, &mut exec).unwrap();
        assert_eq!(out, "from-shell");
    }
}

#[test]
fn leaves_discard_partial_output_at_a_linked_dir() {
    let tree = FileTree::from_entries([
        ("a/Android.mk", EntryKind::File),
        ("b/real/Android.mk", EntryKind::File),
        ("b/linked", EntryKind::Symlink),
    ]);
    let stub = StubIndex::with_tree(tree);
    stub.init(&IndexOptions::with_leaf_names(["Android.mk"]));
    let handler = leaves_handler(as_index(&stub));
    let script = resolved(LEAVES, &[("OUT", "out"), ("S", "a b")]);
    let mut exec = MockShellExecutor::new()
        .var("OUT", "out")
        .var("S", "a b")
        .shell_output(&script, "a/Android.mk b/linked/Android.mk b/real/Android.mk");
    let mut out = String::from("pre ");
    handler.eval(&shell(LEAVES), &mut out, &mut exec).unwrap();
    assert_eq!(out, "pre a/Android.mk b/linked/Android.mk b/real/Android.mk");
    assert_eq!(exec.scripts, vec![script]);
}

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_handlers {
    use super::super::{rot13, ShellDate};
    use super::at;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rot13_is_self_inverse(text in "\\PC{0,64}") {
            prop_assert_eq!(rot13(&rot13(&text)), text);
        }

        #[test]
        fn rot13_keeps_non_letters(text in "[^a-zA-Z]{0,64}") {
            prop_assert_eq!(rot13(&text), text);
        }

        #[test]
        fn unknown_date_directives_pass_through(
            format in "(%[aAcjpsuwxyzZ]|[a-z :_-]){0,16}",
        ) {
            let mut out = String::new();
            ShellDate::new(at(2024, 3, 5, 7, 4, 9), &format).eval(&mut out).unwrap();
            prop_assert_eq!(out, format);
        }
    }
}
