//! Getting dump bytes in and recovered bytes out.
//!
//! The carving engine works on a plain `&[u8]`. This module turns a local
//! path or URL into that buffer (unwrapping base64 text containers on the
//! way) and writes a finished report back to disk.

mod container;
mod http;
mod local;
mod writer;

pub use container::{Container, unwrap_base64};
pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use writer::{ReportWriter, WriteSummary, safe_name};

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Largest single read issued by [`ReadAt::read_all`]
const READ_CHUNK: usize = 1024 * 1024;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Read the whole source into memory
    async fn read_all(&self) -> Result<Vec<u8>> {
        let size = usize::try_from(self.size())?;
        let mut data = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            let end = (filled + READ_CHUNK).min(size);
            let n = self.read_at(filled as u64, &mut data[filled..end]).await?;
            if n == 0 {
                bail!("source ended after {} of {} bytes", filled, size);
            }
            filled += n;
        }
        Ok(data)
    }
}

/// True when `source` should be fetched over HTTP
pub fn is_http_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow(Vec<u8>);

    #[async_trait]
    impl ReadAt for Slow {
        async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
            // Never more than three bytes per call
            let start = offset as usize;
            let n = buf.len().min(3).min(self.0.len() - start);
            buf[..n].copy_from_slice(&self.0[start..start + n]);
            Ok(n)
        }

        fn size(&self) -> u64 {
            self.0.len() as u64
        }
    }

    #[tokio::test]
    async fn read_all_loops_over_short_reads() {
        let source = Slow(b"PK\x03\x04 and more".to_vec());
        assert_eq!(source.read_all().await.unwrap(), b"PK\x03\x04 and more");
    }

    #[test]
    fn url_detection() {
        assert!(is_http_url("https://host/dump.b64"));
        assert!(!is_http_url("dump.b64"));
    }
}
