//! 下载链接识别
//!
//! 先找 `href="..."` 形式的显式链接，找不到再找裸 URL

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

/// 题目说明中识别出的文件链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    /// 小写扩展名
    pub ext: String,
}

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=['"]([^'"]+\.(?:pdf|csv|json|xlsx?))['"]"#).expect("href 正则非法")
});
static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(https?://[^\s"'<>]+\.(?:pdf|csv|json|xlsx?))"#).expect("URL 正则非法")
});

/// 在题目说明中查找可下载文件
///
/// `base_url` 用于解析相对路径的 href
pub fn find_download_link(instructions: &str, base_url: Option<&str>) -> Option<DownloadLink> {
    let raw = first_capture(&HREF_RE, instructions)
        .or_else(|| first_capture(&BARE_URL_RE, instructions))?;

    let url = resolve(&raw, base_url);
    let ext = file_extension(&url);

    Some(DownloadLink { url, ext })
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn resolve(raw: &str, base_url: Option<&str>) -> String {
    if let Ok(absolute) = Url::parse(raw) {
        return absolute.to_string();
    }
    base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(raw).ok())
        .map(|joined| joined.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// 取 URL 最后一个点之后的部分作为扩展名，取不到时默认 pdf
fn file_extension(url: &str) -> String {
    url.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .unwrap_or("pdf")
        .to_ascii_lowercase()
}
