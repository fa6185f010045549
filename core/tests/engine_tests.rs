use search_core::documents::{DocumentLoader, FileEnumerator};
use search_core::{CorpusIndex, EngineError, IndexStore, ParseMode, SearchEngine};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_docs(root: &Path, docs: &[(&str, &str)]) {
    for (name, body) in docs {
        let p = root.join(name);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(p, body).unwrap();
    }
}

fn engine(dir: &TempDir, mode: ParseMode) -> SearchEngine {
    SearchEngine::new(IndexStore::new(dir.path().join("index.json")), mode)
}

fn key(root: &Path, name: &str) -> String {
    root.join(name).to_string_lossy().into_owned()
}

#[test]
fn ranks_documents_by_tf_idf() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("doc1", "cat dog cat"), ("doc2", "dog dog dog")]);
    let engine = engine(&dir, ParseMode::Plain);
    engine.index(&root).unwrap();

    let hits = engine.search("cat");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc, key(&root, "doc1"));
    assert_eq!(hits[1].doc, key(&root, "doc2"));
    let expected = (2.0f32 / 3.0) * 2f32.log10();
    assert!((hits[0].score - expected).abs() < 1e-4);
    assert!((hits[0].score - 0.2007).abs() < 1e-3);
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn repeated_query_terms_double_the_score() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("doc1", "cat dog cat"), ("doc2", "dog dog dog")]);
    let engine = engine(&dir, ParseMode::Plain);
    engine.index(&root).unwrap();

    let once = engine.search("cat");
    let twice = engine.search("cat cat");
    assert_eq!(twice[0].doc, key(&root, "doc1"));
    assert!((twice[0].score - 2.0 * once[0].score).abs() < 1e-5);
    assert_eq!(twice[1].score, 0.0);
}

#[test]
fn rebuilding_an_unchanged_tree_is_idempotent() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("a.txt", "one two"), ("sub/b.txt", "two three 3"), ("sub/deeper/c.txt", "")]);
    let engine = engine(&dir, ParseMode::Plain);

    engine.index(&root).unwrap();
    let first = engine.store().try_load().unwrap();
    engine.index(&root).unwrap();
    let second = engine.store().try_load().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(first.get(&key(&root, "sub/deeper/c.txt")).unwrap().is_empty());
}

#[test]
fn rebuild_replaces_the_previous_index_wholesale() {
    let dir = tempdir().unwrap();
    let old_root = dir.path().join("old");
    let new_root = dir.path().join("new");
    write_docs(&old_root, &[("gone.txt", "stale words")]);
    write_docs(&new_root, &[("fresh.txt", "fresh words")]);
    let engine = engine(&dir, ParseMode::Plain);

    engine.index(&old_root).unwrap();
    engine.index(&new_root).unwrap();
    let corpus = engine.store().try_load().unwrap();
    assert_eq!(corpus.len(), 1);
    assert!(corpus.get(&key(&new_root, "fresh.txt")).is_some());
}

#[test]
fn markup_mode_strips_tags() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("a.xml", "<doc><title>Whale</title></doc>")]);

    let markup = engine(&dir, ParseMode::Markup);
    markup.index(&root).unwrap();
    let counts = markup.store().try_load().unwrap().get(&key(&root, "a.xml")).cloned().unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get("WHALE"), Some(&1));

    let plain = engine(&dir, ParseMode::Plain);
    plain.index(&root).unwrap();
    let counts = plain.store().try_load().unwrap().get(&key(&root, "a.xml")).cloned().unwrap();
    assert_eq!(counts.get("TITLE"), Some(&2));
    assert_eq!(counts.get("<"), Some(&4));
}

#[test]
fn invalid_root_persists_an_empty_index() {
    let dir = tempdir().unwrap();
    let engine = engine(&dir, ParseMode::Plain);
    let report = engine.index(dir.path().join("missing")).unwrap();
    assert_eq!(report.num_docs, 0);
    assert_eq!(engine.store().try_load().unwrap(), CorpusIndex::new());
    assert!(engine.search("anything").is_empty());
}

#[test]
fn search_without_index_is_empty() {
    let dir = tempdir().unwrap();
    assert!(engine(&dir, ParseMode::Plain).search("cat").is_empty());

    fs::write(dir.path().join("index.json"), "not json").unwrap();
    assert!(engine(&dir, ParseMode::Plain).search("cat").is_empty());
}

#[test]
fn unwritable_index_location_is_reported() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("a.txt", "cat")]);
    // A regular file where the index directory should be.
    fs::write(dir.path().join("blocker"), "").unwrap();
    let engine = SearchEngine::new(IndexStore::new(dir.path().join("blocker/index.json")), ParseMode::Plain);
    assert!(matches!(engine.index(&root), Err(EngineError::Persist(_))));
}

struct FixedFiles(Vec<PathBuf>);

impl FileEnumerator for FixedFiles {
    fn list_files(&self, _root: &Path) -> Result<Vec<PathBuf>, EngineError> {
        Ok(self.0.clone())
    }
}

/// Serves `cat` for every path except `broken`, which fails.
struct FlakyLoader;

impl DocumentLoader for FlakyLoader {
    fn load(&self, path: &Path, _mode: ParseMode) -> Result<String, EngineError> {
        if path == Path::new("broken") {
            Err(EngineError::DocumentUnreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        } else {
            Ok("cat".to_string())
        }
    }
}

#[test]
fn unreadable_documents_index_as_empty() {
    let dir = tempdir().unwrap();
    let engine = SearchEngine::with_collaborators(
        IndexStore::new(dir.path().join("index.json")),
        FixedFiles(vec![PathBuf::from("good"), PathBuf::from("broken")]),
        FlakyLoader,
        ParseMode::Plain,
    );
    let report = engine.index("ignored").unwrap();
    assert_eq!(report.num_docs, 2);
    assert_eq!(report.unreadable_docs, 1);

    let corpus = engine.store().try_load().unwrap();
    assert!(corpus.get("broken").unwrap().is_empty());
    assert_eq!(corpus.get("good").unwrap().get("CAT"), Some(&1));

    let hits = engine.search("cat");
    assert_eq!(hits[0].doc, "good");
    assert!((hits[0].score - 2f32.log10()).abs() < 1e-6);
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn search_top_truncates() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("a", "x"), ("b", "y"), ("c", "z")]);
    let engine = engine(&dir, ParseMode::Plain);
    engine.index(&root).unwrap();
    assert_eq!(engine.search_top("x", 2).len(), 2);
    assert_eq!(engine.search_top("x", 0).len(), 0);
}

#[test]
fn every_search_reads_the_current_index() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    write_docs(&first, &[("a.txt", "whale song"), ("b.txt", "deck")]);
    write_docs(&second, &[("c.txt", "whale bone"), ("d.txt", "sail")]);
    let engine = engine(&dir, ParseMode::Plain);

    engine.index(&first).unwrap();
    assert_eq!(engine.search("whale")[0].doc, key(&first, "a.txt"));

    engine.index(&second).unwrap();
    let hits = engine.search("whale");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc, key(&second, "c.txt"));
    assert!(hits.iter().all(|h| h.doc.starts_with(&*second.to_string_lossy())));
}

#[test]
fn search_sees_a_removed_or_corrupted_index() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("a.txt", "whale"), ("b.txt", "ship")]);
    let engine = engine(&dir, ParseMode::Plain);
    engine.index(&root).unwrap();
    assert_eq!(engine.search("whale").len(), 2);

    fs::write(engine.store().path(), "{ truncated").unwrap();
    assert!(engine.search("whale").is_empty());

    engine.index(&root).unwrap();
    assert_eq!(engine.search("whale").len(), 2);
    fs::remove_file(engine.store().path()).unwrap();
    assert!(engine.search("whale").is_empty());
}

#[cfg(unix)]
#[test]
fn linked_documents_are_searchable() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let root = dir.path().join("files");
    write_docs(&root, &[("real.txt", "ship")]);
    fs::write(dir.path().join("outside.txt"), "whale").unwrap();
    symlink(dir.path().join("outside.txt"), root.join("link.txt")).unwrap();
    symlink(&root, root.join("loop")).unwrap();

    let engine = engine(&dir, ParseMode::Plain);
    let report = engine.index(&root).unwrap();
    assert_eq!(report.num_docs, 2);

    let hits = engine.search("whale");
    assert_eq!(hits[0].doc, key(&root, "link.txt"));
    assert!(hits[0].score > 0.0);
}

#[cfg(unix)]
#[test]
fn non_utf8_paths_are_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let engine = SearchEngine::with_collaborators(
        IndexStore::new(dir.path().join("index.json")),
        FixedFiles(vec![
            PathBuf::from(OsStr::from_bytes(b"doc\xff1")),
            PathBuf::from(OsStr::from_bytes(b"doc\xfe1")),
            PathBuf::from("good"),
        ]),
        FlakyLoader,
        ParseMode::Plain,
    );
    let report = engine.index("ignored").unwrap();
    assert_eq!(report.num_docs, 1);
    assert_eq!(report.skipped_docs, 2);
    assert_eq!(engine.store().try_load().unwrap().len(), 1);
}
