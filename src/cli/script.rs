//! Category scripts: one tree command per line.
//!
//! ```text
//! # build a small hierarchy under the root
//! add animal
//! add cat animal
//! add "big cat" animal/cat
//! move "animal/cat/big cat" animal
//! rename animal/cat kitten
//! depth 2
//! ```
//!
//! Tokens are separated by whitespace; double quotes group a token that
//! contains spaces. `#` starts a comment when it begins a token.

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};
use crate::domain::{
    CategoryError, CategoryId, CategoryPath, CategoryResult, CategoryTree, CategoryUpdate,
    TreeDisplay,
};

/// A parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Add { name: String, parent: Option<String> },
    Move { path: String, new_parent: String },
    Delete { path: String },
    Rename { path: String, name: String },
    Describe { path: String, text: String },
    Get { path: String },
    Find { path: String },
    Depth { depth: usize },
    Size { path: Option<String> },
    Leaves { path: Option<String> },
    Tree { path: Option<String> },
}

/// What a command produced, for the caller to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tree was changed
    Changed(String),
    /// Query results, one entry per line
    Lines(Vec<String>),
    /// A lookup or delete that found nothing
    Miss(String),
}

/// Split a line into tokens, honouring double quotes and `#` comments.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '#' if !quoted && !in_token => break,
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn arity(command: &str, args: &[String], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{}..{}", min, max)
        };
        return Err(format!(
            "'{}' takes {} argument(s), got {}",
            command,
            expected,
            args.len()
        ));
    }
    Ok(())
}

/// Parse a single line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let tokens = tokenize(line)?;
    let Some((command, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let arg = |i: usize| args[i].clone();
    let opt = |i: usize| args.get(i).cloned();

    let parsed = match command.as_str() {
        "add" => {
            arity(command, args, 1, 2)?;
            ScriptCommand::Add {
                name: arg(0),
                parent: opt(1),
            }
        }
        "move" => {
            arity(command, args, 2, 2)?;
            ScriptCommand::Move {
                path: arg(0),
                new_parent: arg(1),
            }
        }
        "delete" => {
            arity(command, args, 1, 1)?;
            ScriptCommand::Delete { path: arg(0) }
        }
        "rename" => {
            arity(command, args, 2, 2)?;
            ScriptCommand::Rename {
                path: arg(0),
                name: arg(1),
            }
        }
        "describe" => {
            arity(command, args, 2, usize::MAX)?;
            ScriptCommand::Describe {
                path: arg(0),
                text: args[1..].iter().join(" "),
            }
        }
        "get" => {
            arity(command, args, 1, 1)?;
            ScriptCommand::Get { path: arg(0) }
        }
        "find" => {
            arity(command, args, 1, 1)?;
            ScriptCommand::Find { path: arg(0) }
        }
        "depth" => {
            arity(command, args, 1, 1)?;
            let depth = args[0]
                .parse()
                .map_err(|_| format!("depth must be a non-negative integer, got '{}'", args[0]))?;
            ScriptCommand::Depth { depth }
        }
        "size" => {
            arity(command, args, 0, 1)?;
            ScriptCommand::Size { path: opt(0) }
        }
        "leaves" => {
            arity(command, args, 0, 1)?;
            ScriptCommand::Leaves { path: opt(0) }
        }
        "tree" => {
            arity(command, args, 0, 1)?;
            ScriptCommand::Tree { path: opt(0) }
        }
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(parsed))
}

/// A parsed command together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number
    pub line: usize,
    /// The line as written, without surrounding whitespace
    pub source: String,
    pub command: ScriptCommand,
}

/// Parse a whole script, keeping line numbers for error reporting.
#[instrument(level = "debug", skip(source))]
pub fn parse_script(source: &str) -> CliResult<Vec<ScriptLine>> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Ok(Some(command)) => commands.push(ScriptLine {
                line: line_no,
                source: line.trim().to_string(),
                command,
            }),
            Ok(None) => {}
            Err(message) => {
                return Err(CliError::Parse {
                    line: line_no,
                    message,
                })
            }
        }
    }
    debug!("parsed {} commands", commands.len());
    Ok(commands)
}

/// Executes script commands against a tree rooted at a single category.
#[derive(Debug)]
pub struct ScriptRunner {
    tree: CategoryTree,
    root: CategoryId,
}

impl ScriptRunner {
    pub fn new(root_name: &str) -> CategoryResult<Self> {
        let mut tree = CategoryTree::new();
        let root = tree.create(root_name)?;
        Ok(Self { tree, root })
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn root(&self) -> CategoryId {
        self.root
    }

    fn path_string(&self, id: CategoryId) -> String {
        self.tree
            .path_of(id)
            .as_ref()
            .map(CategoryPath::to_string)
            .unwrap_or_default()
    }

    fn resolve(&self, path: Option<&str>) -> CategoryResult<CategoryId> {
        let path = path.unwrap_or_default();
        self.tree
            .get(self.root, path)
            .ok_or_else(|| CategoryError::PathNotFound(path.to_string()))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn run_command(&mut self, command: &ScriptCommand) -> CategoryResult<Outcome> {
        let outcome = match command {
            ScriptCommand::Add { name, parent } => {
                let target = self.resolve(parent.as_deref())?;
                let node = self.tree.create_with(name, Some(target), &[])?;
                Outcome::Changed(format!("added {}", self.path_string(node)))
            }
            ScriptCommand::Move { path, new_parent } => {
                self.tree.move_category(self.root, path, new_parent)?;
                Outcome::Changed(format!("moved {} under {}", path, new_parent))
            }
            ScriptCommand::Delete { path } => {
                if self.tree.delete(self.root, path)? {
                    Outcome::Changed(format!("deleted {}", path))
                } else {
                    Outcome::Miss(format!("no category at {}", path))
                }
            }
            ScriptCommand::Rename { path, name } => {
                let node = self.resolve(Some(path))?;
                self.tree.update(node, CategoryUpdate::rename(name.as_str()))?;
                Outcome::Changed(format!("renamed {} to {}", path, self.path_string(node)))
            }
            ScriptCommand::Describe { path, text } => {
                let node = self.resolve(Some(path))?;
                let update = CategoryUpdate::default().with_description(text.as_str());
                self.tree.update(node, update)?;
                Outcome::Changed(format!("described {}", self.path_string(node)))
            }
            ScriptCommand::Get { path } => match self.tree.get(self.root, path) {
                Some(id) => Outcome::Lines(vec![self.describe(id)]),
                None => Outcome::Miss(format!("no category at {}", path)),
            },
            ScriptCommand::Find { path } => match self.tree.find(self.root, path) {
                Some(id) => Outcome::Lines(vec![self.describe(id)]),
                None => Outcome::Miss(format!("no category matches {}", path)),
            },
            ScriptCommand::Depth { depth } => Outcome::Lines(
                self.tree
                    .get_by_depth(self.root, *depth)
                    .into_iter()
                    .map(|id| self.path_string(id))
                    .collect(),
            ),
            ScriptCommand::Size { path } => {
                let node = self.resolve(path.as_deref())?;
                Outcome::Lines(vec![self.tree.size(node).to_string()])
            }
            ScriptCommand::Leaves { path } => {
                let node = self.resolve(path.as_deref())?;
                Outcome::Lines(
                    self.tree
                        .leaves(node)
                        .into_iter()
                        .map(|id| self.path_string(id))
                        .collect(),
                )
            }
            ScriptCommand::Tree { path } => {
                let node = self.resolve(path.as_deref())?;
                let rendered = self.tree.to_tree_string(node).to_string();
                Outcome::Lines(rendered.lines().map(str::to_string).collect())
            }
        };
        Ok(outcome)
    }

    fn describe(&self, id: CategoryId) -> String {
        let path = self.path_string(id);
        match self.tree.description(id) {
            Some(text) => format!("{}: {}", path, text),
            None => path,
        }
    }
}
