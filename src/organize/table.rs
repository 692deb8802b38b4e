use serde::{Deserialize, Serialize};
use std::path::Path;

/// One destination folder and the extensions routed to it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Extensions may be given with or without the leading dot and in any case.
    pub fn new<S: AsRef<str>>(name: impl Into<String>, extensions: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn matches(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| normalize(e) == extension)
    }
}

/// Maps file extensions to category folder names. Categories are checked in order, so when two
/// categories list the same extension the first one wins. Files that match nothing go to
/// `fallback`.
///
/// In `config.json` the table looks like this:
///
/// ```json
/// {
///   "categories": [
///     { "name": "Imagenes", "extensions": [".jpg", ".png"] },
///     { "name": "Documentos", "extensions": [".pdf"] }
///   ],
///   "fallback": "Otros"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: String,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>, fallback: impl Into<String>) -> Self {
        Self {
            categories,
            fallback: fallback.into(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Every folder name this table can produce, fallback last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(Category::name)
            .chain(std::iter::once(self.fallback.as_str()))
    }

    /// Returns the category folder for `file`, comparing extensions case-insensitively. A file
    /// without an extension goes to the fallback.
    pub fn classify(&self, file: &Path) -> &str {
        let extension = match file.extension() {
            Some(ext) => normalize(&ext.to_string_lossy()),
            None => return &self.fallback,
        };
        self.categories
            .iter()
            .find(|c| c.matches(&extension))
            .map(Category::name)
            .unwrap_or(&self.fallback)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(
            vec![
                Category::new(
                    "Imagenes",
                    ["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff"],
                ),
                Category::new(
                    "Documentos",
                    ["pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "ppt", "pptx"],
                ),
                Category::new(
                    "Videos",
                    ["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v"],
                ),
                Category::new("Audio", ["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a"]),
                Category::new(
                    "Archivos_Comprimidos",
                    ["zip", "rar", "7z", "tar", "gz", "bz2"],
                ),
                Category::new(
                    "Codigo",
                    ["py", "js", "html", "css", "java", "cpp", "c", "php", "rb", "go"],
                ),
                Category::new("Ejecutables", ["exe", "msi", "deb", "rpm", "dmg", "pkg"]),
            ],
            "Otros",
        )
    }
}

/// Lowercase with the leading dot removed: `".PNG"` -> `"png"`.
fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(Path::new("photo.png")), "Imagenes");
        assert_eq!(table.classify(Path::new("PHOTO.PNG")), "Imagenes");
        assert_eq!(table.classify(Path::new("report.PdF")), "Documentos");
        assert_eq!(table.classify(Path::new("backup.tar.gz")), "Archivos_Comprimidos");
        assert_eq!(table.classify(Path::new("main.go")), "Codigo");
    }

    #[test]
    fn test_fallback() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(Path::new("data.xyz")), "Otros");
        assert_eq!(table.classify(Path::new("README")), "Otros");
        assert_eq!(table.classify(Path::new(".bashrc")), "Otros");
        assert_eq!(table.classify(Path::new("trailing.")), "Otros");
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable::new(
            vec![
                Category::new("Rust", [".RS", "toml"]),
                Category::new("Also", ["rs"]),
            ],
            "Misc",
        );
        assert_eq!(table.classify(Path::new("lib.rs")), "Rust");
        assert_eq!(table.classify(Path::new("Cargo.toml")), "Rust");
        assert_eq!(table.classify(Path::new("photo.png")), "Misc");
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Rust", "Also", "Misc"]);
        assert_eq!(table.categories()[0].extensions(), ["rs", "toml"]);
    }

    #[test]
    fn test_json_table() {
        let json = r#"{
            "categories": [{ "name": "Pics", "extensions": [".JPG"] }],
            "fallback": "Rest"
        }"#;
        let table: CategoryTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.classify(Path::new("a.jpg")), "Pics");
        assert_eq!(table.classify(Path::new("a.png")), "Rest");
    }
}
