//! Textual command language over a [`Store`]
//!
//! A line is split on whitespace. The first token picks the container kind
//! by prefix (`M` array, `F` singly list, `L` doubly list, `S` stack,
//! `Q` queue, `T` tree) or names a generic verb (`PRINT`, `SIZE`, `SAVE`,
//! `LOAD`, `HELP`, `EXIT`). Parsing produces a typed [`Command`];
//! [`execute`] applies it and renders the reply line (`SUCCESS: ...`,
//! `VALUE: ...`, `FOUND: ...`, ...). Failures come back as [`DsdbError`] and
//! are rendered by [`render`].

pub mod session;

pub use session::Session;

use crate::codec;
use crate::containers::TraversalOrder;
use crate::error::{DsdbError, Result};
use crate::store::{ContainerKind, Store};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Array sub-commands (`M*`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayOp {
    /// `MPUSH name value`
    Push(String),
    /// `MINSERT name index value`
    Insert(i64, String),
    /// `MGET name index`
    Get(i64),
    /// `MDEL name index`
    Delete(i64),
    /// `MREPLACE name index value`
    Replace(i64, String),
    /// `MSIZE name`
    Size,
}

/// Linked list sub-commands (`F*` and `L*`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ListOp {
    PushFront(String),
    PushBack(String),
    InsertBefore { target: String, value: String },
    InsertAfter { target: String, value: String },
    PopFront,
    PopBack,
    RemoveValue(String),
    RemoveBefore(String),
    RemoveAfter(String),
    /// `FGET name` with no value: render the whole list
    Show,
    Find(String),
    Size,
    PrintBackward,
}

/// Stack and queue sub-commands (`S*` and `Q*`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BufferOp {
    Push(String),
    Pop,
    Peek,
    Size,
}

/// Tree sub-commands (`T*`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    /// `TINSERT name key value`
    Insert(i64, String),
    /// `TSEARCH name key`
    Search(i64),
    /// `TISFULL name`
    IsFull,
    /// `THEIGHT name`
    Height,
    /// `TSIZE name`
    Size,
    /// `TTRAVERSE name order`
    Traverse(TraversalOrder),
}

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Command {
    /// `MCREATE`, `FCREATE`, `LCREATE`, `SCREATE`, `QCREATE`, `TCREATE`
    Create { kind: ContainerKind, name: String },
    Array { name: String, op: ArrayOp },
    SinglyList { name: String, op: ListOp },
    DoublyList { name: String, op: ListOp },
    Stack { name: String, op: BufferOp },
    Queue { name: String, op: BufferOp },
    Tree { name: String, op: TreeOp },
    Print { name: String },
    Size { name: String },
    Save { path: Option<PathBuf> },
    Load { path: Option<PathBuf> },
    Help,
    Exit,
}

impl Command {
    /// Whether a successful run changes the store
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Array { op, .. } => !matches!(op, ArrayOp::Get(_) | ArrayOp::Size),
            Command::SinglyList { op, .. } | Command::DoublyList { op, .. } => !matches!(
                op,
                ListOp::Show | ListOp::Find(_) | ListOp::Size | ListOp::PrintBackward
            ),
            Command::Stack { op, .. } | Command::Queue { op, .. } => {
                matches!(op, BufferOp::Push(_) | BufferOp::Pop)
            }
            Command::Tree { op, .. } => matches!(op, TreeOp::Insert(..)),
            Command::Create { .. } | Command::Load { .. } => true,
            Command::Print { .. } | Command::Size { .. } | Command::Save { .. } => false,
            Command::Help | Command::Exit => false,
        }
    }
}

/// Cursor over the tokens after the command word
struct Args<'a> {
    command: String,
    tokens: std::slice::Iter<'a, &'a str>,
}

impl<'a> Args<'a> {
    fn required(&mut self, what: &str) -> Result<&'a str> {
        self.tokens
            .next()
            .copied()
            .ok_or_else(|| DsdbError::invalid_argument(format!("{} requires {}", self.command, what)))
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.tokens.next().copied()
    }

    fn value(&mut self) -> Result<String> {
        self.required("value").map(str::to_string)
    }

    fn index(&mut self) -> Result<i64> {
        let token = self.required("index")?;
        token
            .parse()
            .map_err(|_| DsdbError::invalid_argument(format!("Invalid index '{}'", token)))
    }

    fn key(&mut self) -> Result<i64> {
        let token = self.required("key")?;
        token
            .parse()
            .map_err(|_| DsdbError::invalid_argument(format!("Invalid key format '{}'", token)))
    }

    fn name(&mut self) -> Result<String> {
        self.required("container name").map(str::to_string)
    }

    fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

fn unknown(command: &str) -> DsdbError {
    DsdbError::invalid_argument(format!("Unknown command: {}", command))
}

fn parse_array(verb: &str, args: &mut Args<'_>) -> Result<ArrayOp> {
    Ok(match verb {
        "PUSH" => ArrayOp::Push(args.value()?),
        "INSERT" => {
            let index = args.index()?;
            ArrayOp::Insert(index, args.value()?)
        }
        "GET" => ArrayOp::Get(args.index()?),
        "DEL" => ArrayOp::Delete(args.index()?),
        "REPLACE" => {
            let index = args.index()?;
            ArrayOp::Replace(index, args.value()?)
        }
        "SIZE" => ArrayOp::Size,
        _ => return Err(unknown(&args.command)),
    })
}

fn parse_list(verb: &str, args: &mut Args<'_>) -> Result<ListOp> {
    Ok(match verb {
        "PUSH" => {
            let position = args.required("position (FRONT/BACK/BEFORE/AFTER)")?;
            match position.to_ascii_uppercase().as_str() {
                "FRONT" => ListOp::PushFront(args.value()?),
                "BACK" => ListOp::PushBack(args.value()?),
                "BEFORE" => {
                    let target = args.required("target and value")?.to_string();
                    ListOp::InsertBefore {
                        target,
                        value: args.value()?,
                    }
                }
                "AFTER" => {
                    let target = args.required("target and value")?.to_string();
                    ListOp::InsertAfter {
                        target,
                        value: args.value()?,
                    }
                }
                other => {
                    return Err(DsdbError::invalid_argument(format!(
                        "Invalid push type '{}'. Use FRONT/BACK/BEFORE/AFTER",
                        other
                    )))
                }
            }
        }
        "DEL" => {
            let position = args.required("type (FRONT/BACK/VALUE/BEFORE/AFTER)")?;
            match position.to_ascii_uppercase().as_str() {
                "FRONT" => ListOp::PopFront,
                "BACK" => ListOp::PopBack,
                "VALUE" => ListOp::RemoveValue(args.value()?),
                "BEFORE" => ListOp::RemoveBefore(args.required("target value")?.to_string()),
                "AFTER" => ListOp::RemoveAfter(args.required("target value")?.to_string()),
                other => {
                    return Err(DsdbError::invalid_argument(format!(
                        "Invalid delete type '{}'. Use FRONT/BACK/VALUE/BEFORE/AFTER",
                        other
                    )))
                }
            }
        }
        "GET" => match (args.optional(), args.remaining()) {
            (None, _) => ListOp::Show,
            (Some(value), 0) => ListOp::Find(value.to_string()),
            (Some(_), _) => {
                return Err(DsdbError::invalid_argument(format!(
                    "{} takes no value (show the list) or one value (search)",
                    args.command
                )))
            }
        },
        "SIZE" => ListOp::Size,
        "PRINT_BACKWARD" => ListOp::PrintBackward,
        _ => return Err(unknown(&args.command)),
    })
}

fn parse_buffer(verb: &str, args: &mut Args<'_>) -> Result<BufferOp> {
    Ok(match verb {
        "PUSH" => BufferOp::Push(args.value()?),
        "POP" => BufferOp::Pop,
        "PEEK" => BufferOp::Peek,
        "SIZE" => BufferOp::Size,
        _ => return Err(unknown(&args.command)),
    })
}

fn parse_tree(verb: &str, args: &mut Args<'_>) -> Result<TreeOp> {
    Ok(match verb {
        "INSERT" => {
            let key = args.key()?;
            TreeOp::Insert(key, args.value()?)
        }
        "SEARCH" => TreeOp::Search(args.key()?),
        "ISFULL" => TreeOp::IsFull,
        "HEIGHT" => TreeOp::Height,
        "SIZE" => TreeOp::Size,
        "TRAVERSE" => TreeOp::Traverse(args.required("type (INORDER/PREORDER/POSTORDER/LEVEL)")?.parse()?),
        _ => return Err(unknown(&args.command)),
    })
}

impl FromStr for Command {
    type Err = DsdbError;

    fn from_str(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((first, rest)) = tokens.split_first() else {
            return Err(DsdbError::invalid_argument("Empty command"));
        };
        let command = first.to_ascii_uppercase();
        let mut args = Args {
            command: command.clone(),
            tokens: rest.iter(),
        };

        match command.as_str() {
            "PRINT" => return Ok(Command::Print { name: args.name()? }),
            "SIZE" => return Ok(Command::Size { name: args.name()? }),
            "SAVE" => {
                return Ok(Command::Save {
                    path: args.optional().map(PathBuf::from),
                })
            }
            "LOAD" => {
                return Ok(Command::Load {
                    path: args.optional().map(PathBuf::from),
                })
            }
            "HELP" => return Ok(Command::Help),
            "EXIT" | "QUIT" => return Ok(Command::Exit),
            _ => {}
        }

        let mut chars = command.chars();
        let kind = match chars.next() {
            Some('M') => ContainerKind::Array,
            Some('F') => ContainerKind::SinglyList,
            Some('L') => ContainerKind::DoublyList,
            Some('S') => ContainerKind::Stack,
            Some('Q') => ContainerKind::Queue,
            Some('T') => ContainerKind::Tree,
            _ => return Err(unknown(&command)),
        };
        let verb = chars.as_str();
        if verb.is_empty() {
            return Err(unknown(&command));
        }
        let name = args.name()?;
        if verb == "CREATE" {
            return Ok(Command::Create { kind, name });
        }
        Ok(match kind {
            ContainerKind::Array => Command::Array {
                op: parse_array(verb, &mut args)?,
                name,
            },
            ContainerKind::SinglyList => Command::SinglyList {
                op: parse_list(verb, &mut args)?,
                name,
            },
            ContainerKind::DoublyList => Command::DoublyList {
                op: parse_list(verb, &mut args)?,
                name,
            },
            ContainerKind::Stack => Command::Stack {
                op: parse_buffer(verb, &mut args)?,
                name,
            },
            ContainerKind::Queue => Command::Queue {
                op: parse_buffer(verb, &mut args)?,
                name,
            },
            ContainerKind::Tree => Command::Tree {
                op: parse_tree(verb, &mut args)?,
                name,
            },
        })
    }
}

fn created(kind: ContainerKind, name: &str) -> String {
    format!("SUCCESS: {} created: {}", kind.display_name(), name)
}

fn target_missing(target: &str) -> DsdbError {
    DsdbError::not_found(format!("Target '{}'", target))
}

fn execute_array(store: &mut Store, name: &str, op: &ArrayOp) -> Result<String> {
    let array = store.array_mut(name)?;
    let len = array.len();
    Ok(match op {
        ArrayOp::Push(value) => {
            array.push_back(value.as_str());
            "SUCCESS: Value pushed to array".to_string()
        }
        ArrayOp::Insert(index, value) => {
            if !array.insert(*index, value.as_str()) {
                return Err(DsdbError::out_of_bounds(*index, len));
            }
            format!("SUCCESS: Value inserted at index {}", index)
        }
        ArrayOp::Get(index) => match array.get(*index) {
            Some(value) => format!("VALUE: {}", value),
            None => return Err(DsdbError::out_of_bounds(*index, len)),
        },
        ArrayOp::Delete(index) => {
            if !array.remove(*index) {
                return Err(DsdbError::out_of_bounds(*index, len));
            }
            format!("SUCCESS: Element removed at index {}", index)
        }
        ArrayOp::Replace(index, value) => {
            if !array.replace(*index, value.as_str()) {
                return Err(DsdbError::out_of_bounds(*index, len));
            }
            format!("SUCCESS: Value replaced at index {}", index)
        }
        ArrayOp::Size => format!("SIZE: {}", len),
    })
}

/// Shared by both list kinds; the two list types expose the same surface.
macro_rules! execute_list {
    ($list:expr, $kind:expr, $op:expr) => {{
        let list = $list;
        let kind: ContainerKind = $kind;
        match $op {
            ListOp::PushFront(value) => {
                list.push_front(value.as_str());
                "SUCCESS: Value pushed to front".to_string()
            }
            ListOp::PushBack(value) => {
                list.push_back(value.as_str());
                "SUCCESS: Value pushed to back".to_string()
            }
            ListOp::InsertBefore { target, value } => {
                if !list.insert_before(target, value.as_str()) {
                    return Err(target_missing(target));
                }
                "SUCCESS: Value inserted before target".to_string()
            }
            ListOp::InsertAfter { target, value } => {
                if !list.insert_after(target, value.as_str()) {
                    return Err(target_missing(target));
                }
                "SUCCESS: Value inserted after target".to_string()
            }
            ListOp::PopFront => {
                if !list.pop_front() {
                    return Err(DsdbError::empty(kind.display_name()));
                }
                "SUCCESS: Front element removed".to_string()
            }
            ListOp::PopBack => {
                if !list.pop_back() {
                    return Err(DsdbError::empty(kind.display_name()));
                }
                "SUCCESS: Back element removed".to_string()
            }
            ListOp::RemoveValue(value) => {
                if !list.remove_value(value) {
                    return Err(DsdbError::not_found(format!("Value '{}'", value)));
                }
                "SUCCESS: Value removed".to_string()
            }
            ListOp::RemoveBefore(target) => {
                if !list.remove_before(target) {
                    return Err(match list.find(target) {
                        None => target_missing(target),
                        Some(_) => DsdbError::invalid_argument(format!(
                            "Cannot remove before '{}': it is the first element",
                            target
                        )),
                    });
                }
                "SUCCESS: Element before target removed".to_string()
            }
            ListOp::RemoveAfter(target) => {
                if !list.remove_after(target) {
                    return Err(match list.find(target) {
                        None => target_missing(target),
                        Some(_) => DsdbError::invalid_argument(format!(
                            "Cannot remove after '{}': it is the last element",
                            target
                        )),
                    });
                }
                "SUCCESS: Element after target removed".to_string()
            }
            ListOp::Show => list.to_string(),
            ListOp::Find(value) => match list.find(value).and_then(|id| list.value(id)) {
                Some(found) => format!("FOUND: {}", found),
                None => "NOT_FOUND".to_string(),
            },
            ListOp::Size => format!("SIZE: {}", list.len()),
            ListOp::PrintBackward => list.backward(),
        }
    }};
}

fn execute_singly(store: &mut Store, name: &str, op: &ListOp) -> Result<String> {
    Ok(execute_list!(store.singly_list_mut(name)?, ContainerKind::SinglyList, op))
}

fn execute_doubly(store: &mut Store, name: &str, op: &ListOp) -> Result<String> {
    Ok(execute_list!(store.doubly_list_mut(name)?, ContainerKind::DoublyList, op))
}

fn execute_stack(store: &mut Store, name: &str, op: &BufferOp) -> Result<String> {
    let stack = store.stack_mut(name)?;
    let empty = || DsdbError::empty(ContainerKind::Stack.display_name());
    Ok(match op {
        BufferOp::Push(value) => {
            stack.push(value.as_str());
            "SUCCESS: Value pushed to stack".to_string()
        }
        BufferOp::Pop => format!("POPPED: {}", stack.pop().ok_or_else(empty)?),
        BufferOp::Peek => format!("PEEK: {}", stack.peek().ok_or_else(empty)?),
        BufferOp::Size => format!("SIZE: {}", stack.len()),
    })
}

fn execute_queue(store: &mut Store, name: &str, op: &BufferOp) -> Result<String> {
    let queue = store.queue_mut(name)?;
    let empty = || DsdbError::empty(ContainerKind::Queue.display_name());
    Ok(match op {
        BufferOp::Push(value) => {
            queue.push(value.as_str());
            "SUCCESS: Value pushed to queue".to_string()
        }
        BufferOp::Pop => format!("POPPED: {}", queue.pop().ok_or_else(empty)?),
        BufferOp::Peek => format!("PEEK: {}", queue.peek().ok_or_else(empty)?),
        BufferOp::Size => format!("SIZE: {}", queue.len()),
    })
}

fn execute_tree(store: &mut Store, name: &str, op: &TreeOp) -> Result<String> {
    let tree = store.tree_mut(name)?;
    Ok(match op {
        TreeOp::Insert(key, value) => {
            tree.insert(*key, value.as_str());
            format!("SUCCESS: Value inserted with key {}", key)
        }
        TreeOp::Search(key) => match tree.search(*key) {
            Some(value) => format!("FOUND: {}", value),
            None => "NOT_FOUND".to_string(),
        },
        TreeOp::IsFull => format!("IS_FULL: {}", if tree.is_full() { "YES" } else { "NO" }),
        TreeOp::Height => format!("HEIGHT: {}", tree.height()),
        TreeOp::Size => format!("SIZE: {}", tree.len()),
        TreeOp::Traverse(order) => tree.render(*order),
    })
}

/// Apply `command` to `store` and render the reply
///
/// `database_path` is used by `SAVE` and `LOAD` when no file is given. A
/// successful `LOAD` replaces the whole store; a failed one leaves it as is.
pub fn execute(store: &mut Store, command: &Command, database_path: &Path) -> Result<String> {
    match command {
        Command::Create { kind, name } => {
            store.create(*kind, name)?;
            Ok(created(*kind, name))
        }
        Command::Array { name, op } => execute_array(store, name, op),
        Command::SinglyList { name, op } => execute_singly(store, name, op),
        Command::DoublyList { name, op } => execute_doubly(store, name, op),
        Command::Stack { name, op } => execute_stack(store, name, op),
        Command::Queue { name, op } => execute_queue(store, name, op),
        Command::Tree { name, op } => execute_tree(store, name, op),
        Command::Print { name } => store.describe(name),
        Command::Size { name } => Ok(format!("SIZE: {}", store.size_of(name)?)),
        Command::Save { path } => {
            let path = path.as_deref().unwrap_or(database_path);
            codec::save(store, path)?;
            Ok(format!("SUCCESS: Database saved to {}", path.display()))
        }
        Command::Load { path } => {
            let path = path.as_deref().unwrap_or(database_path);
            let (loaded, report) = codec::load_with_config(path, store.config().clone())?;
            *store = loaded;
            let mut reply = format!("SUCCESS: Database loaded from {}", path.display());
            if report.skipped > 0 {
                reply.push_str(&format!(" ({} malformed lines skipped)", report.skipped));
            }
            Ok(reply)
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Exit => Ok("Goodbye!".to_string()),
    }
}

/// Render a reply or an `ERROR: ...` line
pub fn render(result: Result<String>) -> String {
    match result {
        Ok(reply) => reply,
        Err(DsdbError::InvalidArgument { message }) => format!("ERROR: {}", message),
        Err(DsdbError::OutOfBounds { index, size }) => {
            format!("ERROR: Invalid index {} (size {})", index, size)
        }
        Err(err) => format!("ERROR: {}", err),
    }
}

/// Parse, execute and render one line
pub fn run_line(store: &mut Store, line: &str, database_path: &Path) -> String {
    render(line.parse::<Command>().and_then(|command| execute(store, &command, database_path)))
}

/// Text printed by `HELP`
pub const HELP: &str = "\
COMMANDS:
PRINT <name>                          - Print any container
SIZE <name>                           - Size of any container
MCREATE <name>                        - Create array
MPUSH <name> <value>                  - Append to array
MINSERT <name> <index> <value>        - Insert into array
MREPLACE <name> <index> <value>       - Replace element at index
MGET <name> <index>                   - Get from array
MDEL <name> <index>                   - Delete from array
MSIZE <name>                          - Array size
FCREATE <name>                        - Create singly list
FPUSH <name> FRONT|BACK <value>       - Push to list
FPUSH <name> BEFORE|AFTER <target> <value>
FDEL <name> FRONT|BACK                - Delete from list
FDEL <name> VALUE|BEFORE|AFTER <value>
FGET <name> [value]                   - Show list, or search it
FSIZE <name>                          - List size
FPRINT_BACKWARD <name>                - Show list back to front
LCREATE, LPUSH, LDEL, LGET, LSIZE, LPRINT_BACKWARD - Same for doubly list
SCREATE <name>                        - Create stack
SPUSH <name> <value>                  - Push to stack
SPOP <name> / SPEEK <name>            - Pop / peek stack
SSIZE <name>                          - Stack size
QCREATE <name>                        - Create queue
QPUSH <name> <value>                  - Push to queue
QPOP <name> / QPEEK <name>            - Pop / peek queue
QSIZE <name>                          - Queue size
TCREATE <name>                        - Create binary tree
TINSERT <name> <key> <value>          - Insert into tree
TSEARCH <name> <key>                  - Search in tree
TISFULL <name>                        - Check if tree is full
THEIGHT <name>                        - Tree height
TSIZE <name>                          - Tree size
TTRAVERSE <name> INORDER|PREORDER|POSTORDER|LEVEL
SAVE [file]                           - Save database
LOAD [file]                           - Load database, replacing everything
HELP                                  - Show this help
EXIT                                  - Save and quit";
