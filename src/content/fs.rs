//! File-backed content store.
//!
//! Every collection is a directory under the content root, every entry a
//! markdown file with TOML front matter:
//!
//! ```text
//! content/blog.posts/en/hello.md
//! +++
//! title = "Hello"
//! [meta]
//! published_on = 2024-01-15
//! tags = ["en/rust"]
//! +++
//! Markdown body...
//! ```
//!
//! Ids carry the collection after the locale, so the file above becomes
//! `en/blog.posts/hello` and `authors/jane.md` becomes `authors/jane`. Same
//! names in different collections never collide. References in front matter
//! may leave the collection out (`en/rust` in `tags`); they are qualified on
//! load.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use walkdir::WalkDir;

use super::{CollectionKey, ContentStore, Entry, EntryData};
use crate::error::StoreError;

const FRONT_MATTER_DELIMITER: &str = "+++";
const EXTENSION: &str = "md";

/// Reads collections from `<root>/<collection>/**/*.md`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    locales: Arc<[String]>,
}

impl FsStore {
    /// `locales` lists the accepted first id segments of localized entries.
    pub fn new(root: impl Into<PathBuf>, locales: impl IntoIterator<Item = String>) -> Self {
        Self {
            root: root.into(),
            locales: locales.into_iter().collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, key: CollectionKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

impl ContentStore for FsStore {
    async fn get_collection(&self, key: CollectionKey) -> Result<Vec<Entry>, StoreError> {
        let dir = self.collection_dir(key);
        let locales = Arc::clone(&self.locales);
        tokio::task::spawn_blocking(move || load_collection(key, &dir, &locales))
            .await
            .map_err(|err| StoreError::Task(err.to_string()))?
    }

    async fn get_entry(&self, key: CollectionKey, id: &str) -> Result<Option<Entry>, StoreError> {
        let path = self.collection_dir(key).join(relative_path(key, id)?);
        let locales = Arc::clone(&self.locales);
        let id = qualify_id(key, id);
        tokio::task::spawn_blocking(move || {
            if !path.is_file() {
                return Ok(None);
            }
            load_entry(key, id, &path, &locales).map(Some)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?
    }
}

/// Load every entry of a collection directory, sorted by path.
fn load_collection(
    key: CollectionKey,
    dir: &Path,
    locales: &[String],
) -> Result<Vec<Entry>, StoreError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(dir).sort_by_file_name() {
        let item = item.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            StoreError::Io(path, err.into())
        })?;
        let path = item.path();
        if !item.file_type().is_file() || path.extension().is_none_or(|ext| ext != EXTENSION) {
            continue;
        }
        let Some(relative) = entry_id(dir, path) else {
            continue;
        };
        entries.push(load_entry(key, qualify_id(key, &relative), path, locales)?);
    }
    Ok(entries)
}

/// `<dir>/en/blog/posts.md` -> `en/blog/posts`
fn entry_id(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?.with_extension("");
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// `rust` or `tags/rust`, given `tags/`.
fn strip_collection<'a>(key: CollectionKey, path: &'a str) -> Option<&'a str> {
    path.strip_prefix(key.as_str())?.strip_prefix('/')
}

/// `en/rust` in `tags` -> `en/tags/rust`, `jane` in `authors` -> `authors/jane`.
/// Ids that already carry the collection are kept.
fn qualify_id(key: CollectionKey, id: &str) -> String {
    let collection = key.as_str();
    match id.split_once('/') {
        Some((locale, rest)) if key.is_localized() => match strip_collection(key, rest) {
            Some(_) => id.to_owned(),
            None => format!("{locale}/{collection}/{rest}"),
        },
        _ if strip_collection(key, id).is_some() => id.to_owned(),
        _ => format!("{collection}/{id}"),
    }
}

/// File of `id` relative to the collection directory. Ids that would leave
/// the directory are rejected.
fn relative_path(key: CollectionKey, id: &str) -> Result<PathBuf, StoreError> {
    let relative = match id.split_once('/') {
        Some((locale, rest)) if key.is_localized() => {
            format!("{locale}/{}", strip_collection(key, rest).unwrap_or(rest))
        }
        _ => strip_collection(key, id).unwrap_or(id).to_owned(),
    };
    let path = PathBuf::from(format!("{relative}.{EXTENSION}"));
    let contained = path.components().all(|c| matches!(c, Component::Normal(_)));
    if relative.is_empty() || !contained {
        return Err(StoreError::InvalidId(id.to_owned()));
    }
    Ok(path)
}

fn load_entry(
    key: CollectionKey,
    id: String,
    path: &Path,
    locales: &[String],
) -> Result<Entry, StoreError> {
    let source =
        fs::read_to_string(path).map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    let (front_matter, body) = split_front_matter(&source)
        .ok_or_else(|| StoreError::MissingFrontMatter(path.to_path_buf()))?;

    let mut table: toml::Table = toml::from_str(front_matter)
        .map_err(|err| StoreError::FrontMatter(path.to_path_buf(), err))?;
    stringify_datetimes(&mut table);
    let mut data = EntryData::from_table(key, table)
        .map_err(|err| StoreError::FrontMatter(path.to_path_buf(), err))?;
    data.for_each_reference_mut(|target, id| *id = qualify_id(target, id));

    let mut entry = Entry::new(id, data);
    if key.is_localized() {
        let locale = entry.locale.clone().unwrap_or_default();
        if !locales.contains(&locale) {
            return Err(StoreError::UnknownLocale {
                path: path.to_path_buf(),
                locale,
            });
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        entry = entry.with_body(body);
    }
    Ok(entry)
}

/// Split `+++\n<toml>\n+++\n<body>` into front matter and body.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.trim_start_matches('\u{feff}').trim_start();
    let rest = rest.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// TOML dates are native values; entry payloads read them as strings.
fn stringify_datetimes(table: &mut toml::Table) {
    fn visit(value: &mut toml::Value) {
        match value {
            toml::Value::Datetime(datetime) => *value = toml::Value::String(datetime.to_string()),
            toml::Value::Array(items) => items.iter_mut().for_each(visit),
            toml::Value::Table(table) => table.iter_mut().map(|(_, v)| v).for_each(visit),
            _ => {}
        }
    }
    table.iter_mut().map(|(_, v)| v).for_each(visit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Site, config::SiteConfig};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn store(dir: &TempDir) -> FsStore {
        FsStore::new(dir.path(), ["en".to_string(), "fr".to_string()])
    }

    #[test]
    fn test_split_front_matter() {
        let (front, body) = split_front_matter("+++\ntitle = \"A\"\n+++\n# Body\n").unwrap();
        assert_eq!(front, "title = \"A\"\n");
        assert_eq!(body, "# Body\n");

        assert!(split_front_matter("title = \"A\"").is_none());
        assert!(split_front_matter("+++\ntitle = \"A\"\n").is_none());
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let (front, body) = split_front_matter("+++\r\ntitle = \"A\"\r\n+++\r\nbody").unwrap();
        assert_eq!(front.trim(), "title = \"A\"");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_entry_id_uses_forward_slashes() {
        let dir = Path::new("/content/index.pages");
        let id = entry_id(dir, &dir.join("en").join("blog").join("posts.md"));
        assert_eq!(id.as_deref(), Some("en/blog/posts"));
    }

    #[test]
    fn test_qualify_id() {
        assert_eq!(qualify_id(CollectionKey::Tags, "en/rust"), "en/tags/rust");
        assert_eq!(qualify_id(CollectionKey::Tags, "en/tags/rust"), "en/tags/rust");
        assert_eq!(
            qualify_id(CollectionKey::IndexPages, "fr/blog.posts"),
            "fr/index.pages/blog.posts"
        );
        assert_eq!(qualify_id(CollectionKey::Authors, "jane"), "authors/jane");
        assert_eq!(qualify_id(CollectionKey::Authors, "authors/jane"), "authors/jane");
    }

    #[test]
    fn test_relative_path() {
        fn path(key: CollectionKey, id: &str) -> Result<String, StoreError> {
            relative_path(key, id).map(|p| p.to_string_lossy().replace('\\', "/"))
        }
        assert_eq!(path(CollectionKey::Tags, "en/tags/rust").unwrap(), "en/rust.md");
        assert_eq!(path(CollectionKey::Tags, "en/rust").unwrap(), "en/rust.md");
        assert_eq!(path(CollectionKey::Authors, "authors/jane").unwrap(), "jane.md");

        for id in ["../../etc/passwd", "en/../../x", "/etc/passwd", ""] {
            let err = relative_path(CollectionKey::Tags, id).unwrap_err();
            assert!(matches!(err, StoreError::InvalidId(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn test_load_collection_with_native_dates() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "blog.posts/en/hello.md",
            "+++\ntitle = \"Hello\"\n[meta]\npublished_on = 2024-01-15\ntags = [\"en/rust\"]\n+++\n## Intro\n",
        );
        write(
            dir.path(),
            "blog.posts/fr/bonjour.md",
            "+++\ntitle = \"Bonjour\"\n[meta]\npublished_on = \"2024-01-16\"\n+++\n",
        );
        write(dir.path(), "blog.posts/en/notes.txt", "ignored");

        let posts = store(&dir).get_collection(CollectionKey::BlogPosts).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "en/blog.posts/hello");
        assert_eq!(posts[0].locale.as_deref(), Some("en"));
        assert_eq!(posts[0].path(), "hello");
        assert_eq!(posts[0].data.tags(), ["en/tags/rust"]);
        assert_eq!(posts[0].data.published_on().unwrap().to_string(), "2024-01-15");
        assert_eq!(posts[0].body.as_deref(), Some("## Intro"));
        assert_eq!(posts[1].id, "fr/blog.posts/bonjour");
        assert!(posts[1].body.is_none());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let dir = TempDir::new().unwrap();
        let notes = store(&dir).get_collection(CollectionKey::Notes).await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_locale_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "pages/de/home.md",
            "+++\ntitle = \"Start\"\n[meta]\npublished_on = 2024-01-15\n+++\n",
        );

        let err = store(&dir).get_collection(CollectionKey::Pages).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownLocale { ref locale, .. } if locale == "de"));
    }

    #[tokio::test]
    async fn test_locale_free_collection_skips_locale_check() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "authors/jane.md", "+++\nname = \"Jane\"\n+++\n");

        let authors = store(&dir).get_collection(CollectionKey::Authors).await.unwrap();
        assert_eq!(authors[0].id, "authors/jane");
        assert_eq!(authors[0].locale, None);
        assert_eq!(authors[0].data.title(), "Jane");
    }

    #[tokio::test]
    async fn test_missing_front_matter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "authors/jane.md", "name = \"Jane\"\n");

        let err = store(&dir).get_collection(CollectionKey::Authors).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingFrontMatter(_)));
    }

    #[tokio::test]
    async fn test_get_entry() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tags/en/rust.md",
            "+++\ntitle = \"Rust\"\n[meta]\npublished_on = 2024-01-15\n+++\n",
        );
        let store = store(&dir);

        let tag = store.get_entry(CollectionKey::Tags, "en/tags/rust").await.unwrap().unwrap();
        assert_eq!(tag.id, "en/tags/rust");
        assert_eq!(tag.data.title(), "Rust");
        let missing = store.get_entry(CollectionKey::Tags, "en/tags/go").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_entry_stays_inside_collection() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "authors/jane.md", "+++\nname = \"Jane\"\n+++\n");
        write(dir.path(), "secret.md", "+++\nname = \"Secret\"\n+++\n");
        let store = store(&dir);

        let err = store.get_entry(CollectionKey::Authors, "../secret").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(ref id) if id == "../secret"));
        assert!(store.get_entry(CollectionKey::Authors, "jane").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_same_name_in_two_collections() {
        let dir = TempDir::new().unwrap();
        let meta = "[meta]\npublished_on = 2024-01-15\n";
        write(dir.path(), "tags/en/rust.md", &format!("+++\ntitle = \"Rust\"\n{meta}+++\n"));
        write(
            dir.path(),
            "blog.categories/en/rust.md",
            &format!("+++\ntitle = \"Rust posts\"\n{meta}+++\n"),
        );
        write(
            dir.path(),
            "blog.posts/en/hello.md",
            "+++\ntitle = \"Hello\"\n[meta]\npublished_on = 2024-01-16\n\
             category = \"en/rust\"\ntags = [\"en/rust\"]\n+++\n",
        );

        let mut config = SiteConfig::default();
        config.i18n.locales = vec!["en".into(), "fr".into()];
        let site = Site::new(store(&dir), config);

        let index = site.entries_index().await.unwrap();
        assert_eq!(index.len(), 3);
        let tag = index.by_id("en/tags/rust").unwrap();
        assert_eq!(tag.route.as_deref(), Some("/tags/rust"));
        let category = index.by_id("en/blog.categories/rust").unwrap();
        assert_eq!(category.route.as_deref(), Some("/blog/categories/rust"));

        let post = &index.by_id("en/blog.posts/hello").unwrap().entry;
        let refs: Vec<_> = post.data.references().collect();
        assert!(refs.iter().all(|r| index.resolve_reference(r).is_some()));
    }
}
