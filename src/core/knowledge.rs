// src/core/knowledge.rs
//! Question/answer knowledge base
//!
//! The knowledge base is a flat, line-oriented text file. Blocks are separated
//! by a line of `+` characters; the first line of a block is the question and
//! every following line is a candidate answer. Only candidates marked with a
//! leading `#` are correct answers. Lines made of `=` are section noise.
//!
//! ```text
//! Capital of France?
//! #Paris
//! Lyon
//! +++++
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;

/// Line fragment that closes a block
const BLOCK_DELIMITER: &str = "+++++";
/// Line fragment that marks a noise line
const SECTION_MARKER: &str = "====";
/// Prefix of a correct answer line
const CORRECT_MARKER: char = '#';

/// One question with its correct answers, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QARecord {
    pub question: String,
    pub answers: Vec<String>,
}

impl QARecord {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answers: Vec::new(),
        }
    }

    /// Records without correct answers never satisfy a lookup
    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }
}

/// Where the knowledge base text is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    Url(String),
    File(PathBuf),
}

impl FromStr for KnowledgeSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable, ordered set of question/answer records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeStore {
    records: Vec<QARecord>,
}

impl KnowledgeStore {
    /// Parse block-formatted text. Never fails: unrecognised lines are
    /// simply candidate answers without a marker, which are dropped.
    pub fn parse(text: &str) -> Self {
        let mut records = Vec::new();
        let mut current: Option<QARecord> = None;

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.contains(SECTION_MARKER) {
                continue;
            }

            if line.contains(BLOCK_DELIMITER) {
                records.extend(current.take());
                continue;
            }

            match current.as_mut() {
                None => current = Some(QARecord::new(line)),
                Some(record) => {
                    if let Some(answer) = line.strip_prefix(CORRECT_MARKER) {
                        record.answers.push(answer.trim().to_string());
                    }
                }
            }
        }

        // An unterminated trailing block still counts
        records.extend(current);

        Self { records }
    }

    /// Fetch and parse the knowledge base. An empty result is an error:
    /// the tool has nothing to show without at least one question.
    pub async fn load(source: &KnowledgeSource, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoadError::Client { source })?;
        Self::load_with_client(source, &client).await
    }

    /// Same as [`KnowledgeStore::load`] with a caller-provided HTTP client
    pub async fn load_with_client(
        source: &KnowledgeSource,
        client: &reqwest::Client,
    ) -> Result<Self, LoadError> {
        let text = match source {
            KnowledgeSource::Url(url) => fetch_url(client, url).await?,
            KnowledgeSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })?;
                String::from_utf8(bytes).map_err(|source| LoadError::Encoding {
                    location: path.display().to_string(),
                    source,
                })?
            }
        };

        let store = Self::parse(&text);
        if store.is_empty() {
            return Err(LoadError::Empty(source.to_string()));
        }

        info!(
            "📚 Loaded {} questions ({} answerable) from {}",
            store.len(),
            store.iter().filter(|r| r.has_answers()).count(),
            source
        );
        Ok(store)
    }

    pub fn records(&self) -> &[QARecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &QARecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize back to block format with every kept answer marked
    pub fn to_block_text(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.question);
            out.push('\n');
            for answer in &record.answers {
                out.push(CORRECT_MARKER);
                out.push_str(answer);
                out.push('\n');
            }
            out.push_str(BLOCK_DELIMITER);
            out.push('\n');
        }
        out
    }
}

impl From<Vec<QARecord>> for KnowledgeStore {
    fn from(records: Vec<QARecord>) -> Self {
        Self { records }
    }
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    debug!("Fetching knowledge base from {}", url);
    let response = client.get(url).send().await.map_err(fetch_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(fetch_err)?;
    String::from_utf8(bytes.to_vec()).map_err(|source| LoadError::Encoding {
        location: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = "What is 2+2?\n#4\n+++++\nCapital of France?\n#Paris\nNothing else\n+++++\n";

    fn record(question: &str, answers: &[&str]) -> QARecord {
        QARecord {
            question: question.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_keeps_only_marked_answers() {
        let store = KnowledgeStore::parse(SAMPLE);
        assert_eq!(
            store.records(),
            &[
                record("What is 2+2?", &["4"]),
                record("Capital of France?", &["Paris"]),
            ]
        );
    }

    #[test]
    fn test_parse_strips_marker_and_whitespace() {
        let store = KnowledgeStore::parse("  Q one  \n  #   spaced answer  \n#tight\n");
        assert_eq!(store.records(), &[record("Q one", &["spaced answer", "tight"])]);
    }

    #[test]
    fn test_parse_skips_noise_and_blank_lines() {
        let text = "=========\n\nFirst?\n\n#a\n==== section ====\n#b\n+++++++++\n\n";
        let store = KnowledgeStore::parse(text);
        assert_eq!(store.records(), &[record("First?", &["a", "b"])]);
    }

    #[test]
    fn test_parse_flushes_trailing_block() {
        let store = KnowledgeStore::parse("One?\n#1\n+++++\nTwo?\n#2");
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[1], record("Two?", &["2"]));
    }

    #[test]
    fn test_parse_block_without_correct_answers() {
        let store = KnowledgeStore::parse("Unknown?\nmaybe\nperhaps\n+++++\n");
        assert_eq!(store.records(), &[record("Unknown?", &[])]);
        assert!(!store.records()[0].has_answers());
    }

    #[test]
    fn test_parse_ignores_repeated_delimiters() {
        let store = KnowledgeStore::parse("+++++\n+++++\nA?\n#x\n+++++\n+++++\n");
        assert_eq!(store.records(), &[record("A?", &["x"])]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let store = KnowledgeStore::parse("A?\r\n#yes\r\n+++++\r\n");
        assert_eq!(store.records(), &[record("A?", &["yes"])]);
    }

    #[test]
    fn test_block_text_reparses_to_same_store() {
        let text = "Q1\n#a\nwrong\n#b\n+++++\nQ2\nnope\n+++++\nQ3\n# c \n";
        let store = KnowledgeStore::parse(text);
        let reparsed = KnowledgeStore::parse(&store.to_block_text());
        assert_eq!(reparsed, store);
        assert_eq!(reparsed.records()[0].answers, vec!["a", "b"]);
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!(
            "https://example.com/answers.txt".parse::<KnowledgeSource>().unwrap(),
            KnowledgeSource::Url("https://example.com/answers.txt".to_string())
        );
        assert_eq!(
            "answers.txt".parse::<KnowledgeSource>().unwrap(),
            KnowledgeSource::File(PathBuf::from("answers.txt"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = KnowledgeSource::File(file.path().to_path_buf());
        let store = KnowledgeStore::load(&source, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_load_empty_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"=====\n\n+++++\n").unwrap();

        let source = KnowledgeSource::File(file.path().to_path_buf());
        let err = KnowledgeStore::load(&source, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = KnowledgeSource::File(dir.path().join("missing.txt"));
        let err = KnowledgeStore::load(&source, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'Q', b'?', b'\n', 0xff, 0xfe]).unwrap();

        let source = KnowledgeSource::File(file.path().to_path_buf());
        let err = KnowledgeStore::load(&source, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Encoding { .. }));
    }

    /// Serve one canned HTTP response on a loopback port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/answer.txt", addr)
    }

    fn loopback_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let url = serve_once("HTTP/1.1 200 OK", SAMPLE).await;
        let store = KnowledgeStore::load_with_client(&KnowledgeSource::Url(url), &loopback_client())
            .await
            .unwrap();
        assert_eq!(store.records()[1], record("Capital of France?", &["Paris"]));
    }

    #[tokio::test]
    async fn test_load_from_url_reports_http_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let err = KnowledgeStore::load_with_client(&KnowledgeSource::Url(url), &loopback_client())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404, .. }));
    }
}
