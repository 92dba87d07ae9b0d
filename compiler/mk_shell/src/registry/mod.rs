//! Registry of recognized shell idioms.
//!
//! Patterns are tried in declaration order and the first match wins, so a
//! more specific template must be declared before any template that could
//! also match its commands.

mod compact;

use std::sync::OnceLock;

use mk_ir::Expr;
use tracing::{error, trace};

use crate::template::{match_template, Captures, Segment};

pub(crate) use compact::{CompactCtx, Compactor};


/// One recognized command shape and how to compact it.
#[derive(Debug)]
pub struct ShellPattern {
    name: &'static str,
    template: Vec<Segment>,
    compactor: Compactor,
}

impl ShellPattern {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn template(&self) -> &[Segment] {
        &self.template
    }

    pub(crate) fn compactor(&self) -> &Compactor {
        &self.compactor
    }

    /// Match `command` against this pattern's template.
    pub fn matches(&self, command: &Expr) -> Option<Captures> {
        match_template(command.segments(), &self.template)
    }
}

/// Ordered collection of [`ShellPattern`]s.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<ShellPattern>,
}

static BUILTIN: OnceLock<PatternRegistry> = OnceLock::new();

impl PatternRegistry {
    /// The process-wide registry of built-in patterns (lazily built).
    pub fn builtin() -> &'static PatternRegistry {
        BUILTIN.get_or_init(|| match build() {
            Ok(patterns) => PatternRegistry { patterns },
            Err(err) => {
                error!(%err, "invalid built-in shell pattern; shell fast paths disabled");
                PatternRegistry {
                    patterns: Vec::new(),
                }
            }
        })
    }

    pub fn patterns(&self) -> &[ShellPattern] {
        &self.patterns
    }

    /// The first pattern matching `command`, with its captures.
    pub fn find(&self, command: &Expr) -> Option<(&ShellPattern, Captures)> {
        self.patterns.iter().find_map(|pattern| {
            let captures = pattern.matches(command);
            trace!(
                pattern = pattern.name,
                matched = captures.is_some(),
                "shell pattern"
            );
            captures.map(|captures| (pattern, captures))
        })
    }

    pub fn get(&self, name: &str) -> Option<&ShellPattern> {
        self.patterns.iter().find(|pattern| pattern.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

const FIND_SUBDIR_ASSETS: &str =
    " ; find ./ -not -name '.*' -and -type f -and -not -type l ; fi";
const JAVA_RESOURCE_FIND: &str = r#" && find . -type d -a -name ".svn" -prune -o -type f -a \! -name "*.java" -a \! -name "package.html" -a \! -name "overview.html" -a \! -name ".*.swp" -a \! -name ".DS_Store" -a \! -name "*~" -print "#;
const FINDLEAVES: &str = "build/tools/findleaves.py --prune=";

fn pattern(name: &'static str, template: Vec<Segment>, compactor: Compactor) -> ShellPattern {
    ShellPattern {
        name,
        template,
        compactor,
    }
}

fn build() -> Result<Vec<ShellPattern>, regex::Error> {
    use Segment::{Literal, Var};

    Ok(vec![
        // echo $(1) | tr 'a-zA-Z' 'n-za-mN-ZA-M'
        pattern(
            "android:rot13",
            vec![
                Literal("echo "),
                Var("text"),
                Literal(" | tr 'a-zA-Z' 'n-za-mN-ZA-M'"),
            ],
            Compactor::Rot13,
        ),
        pattern(
            "android:find-subdir-assets",
            vec![
                Literal("if [ -d "),
                Var("dir"),
                Literal(" ] ; then cd "),
                Var("cd_dir"),
                Literal(FIND_SUBDIR_ASSETS),
            ],
            Compactor::FindInDir,
        ),
        pattern(
            "android:all-java-files-under",
            vec![
                Literal("cd "),
                Var("chdir"),
                Literal(" ; find -L "),
                Var("roots"),
                Literal(r#" -name "*.java" -and -not -name ".*""#),
            ],
            Compactor::FindExtFilesUnder { ext: ".java" },
        ),
        pattern(
            "android:all-proto-files-under",
            vec![
                Literal("cd "),
                Var("chdir"),
                Literal(" ; find -L "),
                Var("roots"),
                Literal(r#" -name "*.proto" -and -not -name ".*""#),
            ],
            Compactor::FindExtFilesUnder { ext: ".proto" },
        ),
        // cd ${TOP_DIR}${LOCAL_PATH}/${dir} && find . -type d -a -name ".svn" -prune ...
        pattern(
            "android:java_resource_file_groups",
            vec![
                Literal("cd "),
                Var("top"),
                Var("local"),
                Segment::pattern("(/)", &["sep"])?,
                Var("dir"),
                Literal(JAVA_RESOURCE_FIND),
            ],
            Compactor::JavaResourceGroup,
        ),
        pattern(
            "android:subdir_cleanspecs",
            vec![
                Literal(FINDLEAVES),
                Var("out"),
                Literal(" --prune=.repo --prune=.git . CleanSpec.mk"),
            ],
            Compactor::FindLeaves {
                name: "CleanSpec.mk",
                fixed_dirs: Some("."),
                mindepth: -1,
            },
        ),
        pattern(
            "android:subdir_makefiles",
            vec![
                Literal(FINDLEAVES),
                Var("out"),
                Literal(" --prune=.repo --prune=.git "),
                Var("dirs"),
                Literal(" Android.mk"),
            ],
            Compactor::FindLeaves {
                name: "Android.mk",
                fixed_dirs: None,
                mindepth: -1,
            },
        ),
        pattern(
            "android:first-makefiles-under",
            vec![
                Literal(FINDLEAVES),
                Var("out"),
                Literal(" --prune=.repo --prune=.git --mindepth=2 "),
                Var("dirs"),
                Literal(" Android.mk"),
            ],
            Compactor::FindLeaves {
                name: "Android.mk",
                fixed_dirs: None,
                mindepth: 2,
            },
        ),
        pattern(
            "shell-date",
            vec![Segment::pattern(r"date \+(\S+)", &["format"])?],
            Compactor::Date,
        ),
        pattern(
            "shell-date-quoted",
            vec![Segment::pattern(r#"date "\+([^"]+)""#, &["format"])?],
            Compactor::Date,
        ),
    ])
}
