//! 上游 CSV 数据源
//!
//! 静态文件托管服务，按固定 URL 只读访问，每次请求重新拉取，不做缓存与重试

use anyhow::{Context, bail};
use bytes::Bytes;
use reqwest::Client;

use crate::common::truncate_with_ellipsis;
use crate::model::config::DatasetConfig;

use super::types::DatasetKind;

/// 上游 blob 存储客户端
#[derive(Clone)]
pub struct BlobStore {
    client: Client,
    datasets: DatasetConfig,
}

impl BlobStore {
    pub fn new(client: Client, datasets: DatasetConfig) -> Self {
        Self { client, datasets }
    }

    /// 拉取数据集原始字节，非 2xx 响应视为失败
    pub async fn fetch_bytes(&self, kind: DatasetKind) -> anyhow::Result<Bytes> {
        let url = kind.url(&self.datasets);
        tracing::debug!("拉取 {} 数据集: {}", kind.label(), url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("请求 {} 数据集失败", kind.label()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "{} 数据集返回 HTTP {}: {}",
                kind.label(),
                status,
                truncate_with_ellipsis(&body, 200)
            );
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("读取 {} 数据集响应失败", kind.label()))?;

        #[cfg(feature = "sensitive-logs")]
        tracing::debug!(
            "{} 数据集内容片段: {}",
            kind.label(),
            truncate_with_ellipsis(&String::from_utf8_lossy(&bytes), 512)
        );

        Ok(bytes)
    }

    /// 拉取数据集文本（UTF-8，非法字节按替换字符处理）
    pub async fn fetch_text(&self, kind: DatasetKind) -> anyhow::Result<String> {
        let bytes = self.fetch_bytes(kind).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
