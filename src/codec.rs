//! Line-oriented text format for persisting a [`Store`]
//!
//! One container per line, fields separated by single spaces:
//!
//! ```text
//! <KIND> <name> <count> <elem1> <elem2> ... <elemN>
//! ```
//!
//! - `ARRAY`, `SINGLY_LIST`, `DOUBLY_LIST`, `QUEUE`: elements front to back
//! - `STACK`: elements bottom to top, so sequential pushes restore the top
//! - `TREE`: `count` is the node count, followed by `<key> <value>` pairs in
//!   level order; sequential breadth-first inserts rebuild the same shape
//!
//! There is no quoting, so names and values must be non-empty and free of
//! whitespace. [`encode`] refuses anything else before a file is touched.
//!
//! Decoding is tolerant. A malformed line, including one that is not valid
//! UTF-8, is skipped and counted in the [`LoadReport`]. A short line loads
//! the elements it has, and a tree pair with an unparseable key drops only
//! that pair.

use crate::config::ContainerConfig;
use crate::containers::{Array, CompleteBinaryTree, DoublyList, Queue, SinglyList, Stack, TraversalOrder};
use crate::error::{DsdbError, Result};
use crate::store::{ContainerKind, Store};
use std::fs;
use std::path::Path;

/// Outcome of decoding a database text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines that produced a container
    pub loaded: usize,
    /// Non-blank lines that were ignored
    pub skipped: usize,
}

fn check_token(kind: ContainerKind, name: &str, token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(DsdbError::invalid_argument(format!(
            "{} '{}': {:?} cannot be saved, values must be non-empty and contain no whitespace",
            kind.display_name(),
            name,
            token
        )));
    }
    Ok(())
}

fn write_line<'a, I>(out: &mut String, kind: ContainerKind, name: &str, count: usize, tokens: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    check_token(kind, name, name)?;
    out.push_str(kind.tag());
    out.push(' ');
    out.push_str(name);
    out.push(' ');
    out.push_str(&count.to_string());
    for token in tokens {
        check_token(kind, name, token)?;
        out.push(' ');
        out.push_str(token);
    }
    out.push('\n');
    Ok(())
}

/// Serialize every container of `store`
///
/// Kinds appear in the order ARRAY, SINGLY_LIST, DOUBLY_LIST, STACK, QUEUE,
/// TREE with names sorted inside each kind, so equal stores encode to equal
/// text.
pub fn encode(store: &Store) -> Result<String> {
    let mut out = String::new();
    for (name, array) in store.arrays() {
        write_line(&mut out, ContainerKind::Array, name, array.len(), array.iter())?;
    }
    for (name, list) in store.singly_lists() {
        write_line(&mut out, ContainerKind::SinglyList, name, list.len(), list.iter())?;
    }
    for (name, list) in store.doubly_lists() {
        write_line(&mut out, ContainerKind::DoublyList, name, list.len(), list.iter())?;
    }
    for (name, stack) in store.stacks() {
        write_line(&mut out, ContainerKind::Stack, name, stack.len(), stack.iter())?;
    }
    for (name, queue) in store.queues() {
        write_line(&mut out, ContainerKind::Queue, name, queue.len(), queue.iter())?;
    }
    for (name, tree) in store.trees() {
        let pairs: Vec<String> = tree
            .iter(TraversalOrder::LevelOrder)
            .flat_map(|(key, value)| [key.to_string(), value.to_string()])
            .collect();
        write_line(&mut out, ContainerKind::Tree, name, tree.len(), pairs.iter().map(String::as_str))?;
    }
    Ok(out)
}

/// Parse database text into a fresh store with default capacities
pub fn decode(text: &str) -> (Store, LoadReport) {
    decode_with_config(text, ContainerConfig::default())
}

/// Parse database text into a fresh store that will use `config` for
/// containers created later
pub fn decode_with_config(text: &str, config: ContainerConfig) -> (Store, LoadReport) {
    decode_bytes_with_config(text.as_bytes(), config)
}

/// Parse raw database bytes line by line
///
/// A line that is not valid UTF-8 is skipped like any other malformed line;
/// the rest of the file still loads.
pub fn decode_bytes_with_config(bytes: &[u8], config: ContainerConfig) -> (Store, LoadReport) {
    let mut store = Store::with_config(config);
    let mut report = LoadReport::default();

    for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line_no = index + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(err) => {
                log::warn!("line {}: not valid UTF-8 ({}), skipping", line_no, err);
                report.skipped += 1;
                continue;
            }
        };
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if decode_line(&mut store, line_no, &fields) {
            report.loaded += 1;
        } else {
            report.skipped += 1;
        }
    }

    (store, report)
}

/// Returns false when the line is skipped
fn decode_line(store: &mut Store, line_no: usize, fields: &[&str]) -> bool {
    if fields.len() < 3 {
        log::warn!("line {}: expected '<KIND> <name> <count>', skipping", line_no);
        return false;
    }
    let Some(kind) = ContainerKind::from_tag(fields[0]) else {
        log::warn!("line {}: unknown container kind '{}', skipping", line_no, fields[0]);
        return false;
    };
    let name = fields[1];
    let Ok(count) = fields[2].parse::<usize>() else {
        log::warn!("line {}: bad element count '{}', skipping", line_no, fields[2]);
        return false;
    };

    let elements = &fields[3..];
    let expected = if kind == ContainerKind::Tree {
        count.saturating_mul(2)
    } else {
        count
    };
    if elements.len() < expected {
        log::warn!(
            "line {}: {} '{}' declares {} elements but has {} fields, loading what is present",
            line_no,
            kind.tag(),
            name,
            count,
            elements.len()
        );
    }
    let values = elements.iter().copied().take(count);
    // The declared count is untrusted; size buffers from what is present.
    let capacity = store.config().capacity_for(count.min(elements.len()));

    let replaced = match kind {
        ContainerKind::Array => {
            let mut array = Array::with_capacity(capacity);
            values.for_each(|v| array.push_back(v));
            store.insert_array(name, array).is_some()
        }
        ContainerKind::SinglyList => store.insert_singly_list(name, values.collect::<SinglyList>()).is_some(),
        ContainerKind::DoublyList => store.insert_doubly_list(name, values.collect::<DoublyList>()).is_some(),
        ContainerKind::Stack => {
            let mut stack = Stack::with_capacity(capacity);
            values.for_each(|v| stack.push(v));
            store.insert_stack(name, stack).is_some()
        }
        ContainerKind::Queue => {
            let mut queue = Queue::with_capacity(capacity);
            values.for_each(|v| queue.push(v));
            store.insert_queue(name, queue).is_some()
        }
        ContainerKind::Tree => {
            let tree = decode_tree(line_no, name, count, elements);
            store.insert_tree(name, tree).is_some()
        }
    };
    if replaced {
        log::warn!("line {}: {} '{}' defined again, later line wins", line_no, kind.tag(), name);
    }
    true
}

fn decode_tree(line_no: usize, name: &str, count: usize, elements: &[&str]) -> CompleteBinaryTree {
    let mut tree = CompleteBinaryTree::new();
    for pair in elements.chunks_exact(2).take(count) {
        match pair[0].parse::<i64>() {
            Ok(key) => {
                tree.insert(key, pair[1]);
            }
            Err(_) => {
                log::warn!("line {}: TREE '{}' has bad key '{}', dropping pair", line_no, name, pair[0]);
            }
        }
    }
    tree
}

/// Write `store` to `path`, truncating any previous contents
///
/// Encoding happens first, so an unencodable value leaves the file untouched.
/// The write itself is not atomic.
pub fn save<P: AsRef<Path>>(store: &Store, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = encode(store)?;
    fs::write(path, text)?;
    log::info!("saved {} containers to {}", store.len(), path.display());
    Ok(())
}

/// Read a database file into a fresh store
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Store, LoadReport)> {
    load_with_config(path, ContainerConfig::default())
}

/// Read a database file into a fresh store configured with `config`
pub fn load_with_config<P: AsRef<Path>>(path: P, config: ContainerConfig) -> Result<(Store, LoadReport)> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let (store, report) = decode_bytes_with_config(&bytes, config);
    log::info!(
        "loaded {} containers from {} ({} lines skipped)",
        report.loaded,
        path.display(),
        report.skipped
    );
    Ok((store, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> Store {
        let mut store = Store::new();
        let array = store.create_array("arr").unwrap();
        array.push_back("x");
        array.push_back("y");
        store.create_singly_list("fl").unwrap().push_back("a");
        let dl = store.create_doubly_list("dl").unwrap();
        dl.push_back("p");
        dl.push_front("o");
        let stack = store.create_stack("st").unwrap();
        stack.push("1");
        stack.push("2");
        stack.push("3");
        let queue = store.create_queue("q").unwrap();
        queue.push("first");
        queue.push("second");
        let tree = store.create_tree("t").unwrap();
        for key in [10, 20, 30, 40] {
            tree.insert(key, format!("v{}", key));
        }
        store
    }

    #[test]
    fn test_encode_format() {
        let text = encode(&sample_store()).unwrap();
        let expected = "\
ARRAY arr 2 x y
SINGLY_LIST fl 1 a
DOUBLY_LIST dl 2 o p
STACK st 3 1 2 3
QUEUE q 2 first second
TREE t 4 10 v10 20 v20 30 v30 40 v40
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_containers() {
        let mut store = Store::new();
        store.create_array("a").unwrap();
        store.create_tree("t").unwrap();
        let text = encode(&store).unwrap();
        assert_eq!(text, "ARRAY a 0\nTREE t 0\n");

        let (decoded, report) = decode(&text);
        assert_eq!((report.loaded, report.skipped), (2, 0));
        assert_eq!(decoded, store);
    }

    #[test]
    fn test_decode_round_trip() {
        let store = sample_store();
        let (decoded, report) = decode(&encode(&store).unwrap());
        assert_eq!(report.loaded, 6);
        assert_eq!(report.skipped, 0);
        assert_eq!(decoded, store);
        assert_eq!(decoded.stack("st").unwrap().peek(), Some("3"));
    }

    #[test]
    fn test_tree_shape_survives() {
        let mut store = Store::new();
        let tree = store.create_tree("t").unwrap();
        for key in [5, 3, 8, 1, 4, 7] {
            tree.insert(key, "v");
        }
        let before = tree.render(TraversalOrder::InOrder);
        let (decoded, _) = decode(&encode(&store).unwrap());
        let tree = decoded.tree("t").unwrap();
        assert_eq!(tree.render(TraversalOrder::InOrder), before);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "\
ARRAY a 2 x y
ARRAY b
BOGUS c 1 z

QUEUE q two a b
STACK s 1 top
";
        let (store, report) = decode(text);
        assert_eq!((report.loaded, report.skipped), (2, 3));
        assert_eq!(store.array("a").unwrap().len(), 2);
        assert_eq!(store.stack("s").unwrap().peek(), Some("top"));
        assert!(store.queue("q").is_err());
    }

    #[test]
    fn test_huge_count_loads_present_elements() {
        let text = "\
ARRAY good 1 x
STACK bad 18446744073709551615 a
QUEUE q 10000000000 first second
TREE t 18446744073709551615 1 one
";
        let (store, report) = decode(text);
        assert_eq!((report.loaded, report.skipped), (4, 0));
        assert_eq!(store.array("good").unwrap().to_vec(), vec!["x"]);

        let stack = store.stack("bad").unwrap();
        assert_eq!(stack.peek(), Some("a"));
        assert_eq!(stack.capacity(), 1);

        let queue = store.queue("q").unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 2);
        assert_eq!(store.tree("t").unwrap().search(1), Some("one"));
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let mut bytes = b"ARRAY keep 2 a b\nSTACK s 1 ".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.extend_from_slice(b"\r\nQUEUE q 1 z\r\n");

        let (store, report) = decode_bytes_with_config(&bytes, ContainerConfig::default());
        assert_eq!((report.loaded, report.skipped), (2, 1));
        assert_eq!(store.array("keep").unwrap().to_vec(), vec!["a", "b"]);
        assert_eq!(store.queue("q").unwrap().peek(), Some("z"));
        assert!(store.stack("s").is_err());
    }

    #[test]
    fn test_load_file_with_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.txt");
        let mut bytes = b"ARRAY keep 2 a b\nSTACK s 1 ".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.extend_from_slice(b"\nQUEUE q 1 z\n");
        std::fs::write(&path, &bytes).unwrap();

        let (store, report) = load(&path).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_short_and_long_lines() {
        let (store, report) = decode("SINGLY_LIST l 4 a b\nARRAY a 1 x extra\n");
        assert_eq!(report.loaded, 2);
        assert_eq!(store.singly_list("l").unwrap().to_vec(), vec!["a", "b"]);
        assert_eq!(store.array("a").unwrap().to_vec(), vec!["x"]);
    }

    #[test]
    fn test_bad_tree_key_drops_pair() {
        let (store, report) = decode("TREE t 3 1 one oops two 3 three\n");
        assert_eq!(report.loaded, 1);
        let tree = store.tree("t").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(3), Some("three"));
        assert_eq!(tree.render(TraversalOrder::LevelOrder), "LEVEL ORDER: (1: one) (3: three)");
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let (store, report) = decode("QUEUE q 1 old\nQUEUE q 1 new\n");
        assert_eq!(report.loaded, 2);
        assert_eq!(store.queue("q").unwrap().peek(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_encode_rejects_unrepresentable() {
        let mut store = Store::new();
        store.create_array("a").unwrap().push_back("two words");
        let err = encode(&store).unwrap_err();
        assert_eq!(err.category(), "argument");

        let mut store = Store::new();
        store.create_stack("s").unwrap().push("");
        assert!(encode(&store).is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.txt");
        let store = sample_store();
        save(&store, &path).unwrap();

        let (loaded, report) = load(&path).unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_failed_encode_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.txt");
        std::fs::write(&path, "ARRAY keep 1 me\n").unwrap();

        let mut store = Store::new();
        store.create_queue("q").unwrap().push("has space");
        assert!(save(&store, &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ARRAY keep 1 me\n");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.category(), "io");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_with_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.txt");
        std::fs::write(&path, "ARRAY a 0\n").unwrap();
        let config = ContainerConfig {
            default_capacity: 7,
            min_capacity: 2,
        };
        let (mut store, _) = load_with_config(&path, config).unwrap();
        assert_eq!(store.array("a").unwrap().capacity(), 2);
        assert_eq!(store.create_stack("s").unwrap().capacity(), 7);
    }
}
