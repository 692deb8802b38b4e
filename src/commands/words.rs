use crate::commands::Out;
use crate::words::{count_words, WordCount};
use crate::{utils, Result};
use serde::Serialize;
use std::path::Path;

/// Structured output of `handy words`.
#[derive(Debug, Clone, Serialize)]
pub struct WordsOut {
    pub total: usize,
    pub distinct: usize,
    pub top: Vec<WordCount>,
}

pub async fn words(file: &Path, top: usize) -> Result<Out<WordsOut>> {
    let text = utils::read(file).await?;
    let stats = count_words(&text);
    let out = WordsOut {
        total: stats.total(),
        distinct: stats.distinct(),
        top: stats.top(top),
    };
    let mut message = format!(
        "El archivo tiene {} palabras ({} distintas)",
        out.total, out.distinct
    );
    for w in &out.top {
        message.push_str(&format!("\n  {:>6}  {}", w.count, w.word));
    }
    Ok(Out::new(message, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_words() {
        let env = TestEnv::new().await;
        let file = env.write("texto.txt", "sol luna sol\nestrella sol luna").await;
        let out = words(&file, 2).await.unwrap();
        assert!(out.message().starts_with("El archivo tiene 6 palabras (3 distintas)"));
        let top = &out.structure().unwrap().top;
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].word.as_str(), top[0].count), ("sol", 3));
        assert_eq!((top[1].word.as_str(), top[1].count), ("luna", 2));
        assert_eq!(out.message().lines().nth(1), Some("       3  sol"));
    }

    #[tokio::test]
    async fn test_words_missing_file() {
        let env = TestEnv::new().await;
        assert!(words(&env.path("nope.txt"), 5).await.is_err());
    }
}
