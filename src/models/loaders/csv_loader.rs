//! 名单加载器
//!
//! 把本地 CSV 文件或在线表格导出的 CSV 解析成 `Vec<AttendeeRecord>`。
//! 列名按同义词优先级匹配，第一个有非空值的列生效；
//! 签到列按 {yes, true, 1, y} 归一化成布尔值。

use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use tracing::debug;

use crate::error::{AppError, SourceError};
use crate::models::attendee::AttendeeRecord;

/// 名字列的同义词，按优先级排列
const FIRST_NAME_COLUMNS: &[&str] =
    &["First Name", "first_name", "FirstName", "firstname", "First", "first"];

/// 姓氏列的同义词
const LAST_NAME_COLUMNS: &[&str] =
    &["Last Name", "last_name", "LastName", "lastname", "Last", "last"];

/// 邮箱列的同义词
const EMAIL_COLUMNS: &[&str] = &["Email", "email", "Email Address", "email_address"];

/// 签到列的同义词
const CHECKED_IN_COLUMNS: &[&str] = &[
    "Checked In",
    "checked_in",
    "CheckedIn",
    "checkedin",
    "Check-in",
    "check-in",
    "Attended",
    "attended",
];

/// 视为 true 的签到取值（小写比较）
static TRUTHY: phf::Set<&'static str> = phf::phf_set! {"yes", "true", "1", "y"};

/// 读取本地 CSV 文件并解析成参会人名单
///
/// 文件读不到或内容解析失败都是整个来源级别的致命错误
pub async fn load_csv_file(path: &str) -> Result<Vec<AttendeeRecord>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Source(SourceError::ReadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })
    })?;
    parse_attendees(&content).map_err(AppError::Source)
}

/// 拉取在线表格并解析成参会人名单
///
/// 表格 URL 会先被改写成直接导出 CSV 的地址；非 2xx 响应视为致命错误
pub async fn fetch_google_sheet(sheet_url: &str) -> Result<Vec<AttendeeRecord>, AppError> {
    let export_url = to_csv_export_url(sheet_url);
    debug!("导出地址: {}", export_url);

    let response = reqwest::get(&export_url).await.map_err(|e| {
        AppError::Source(SourceError::RequestFailed {
            url: export_url.clone(),
            source: Box::new(e),
        })
    })?;

    if !response.status().is_success() {
        return Err(AppError::Source(SourceError::FetchFailed {
            url: export_url,
            status: response.status().as_u16(),
        }));
    }

    let body = response.text().await.map_err(|e| {
        AppError::Source(SourceError::RequestFailed {
            url: export_url.clone(),
            source: Box::new(e),
        })
    })?;

    parse_attendees(&body).map_err(AppError::Source)
}

/// 把常见的表格分享链接改写成 CSV 导出链接
///
/// `.../spreadsheets/d/<ID>/edit#gid=<GID>` →
/// `.../spreadsheets/d/<ID>/export?format=csv&gid=<GID>`
///
/// 识别不出文档 ID 时原样返回，让调用方直接去请求
pub fn to_csv_export_url(sheet_url: &str) -> String {
    let Ok(id_re) = Regex::new(r"/spreadsheets/d/([a-zA-Z0-9-_]+)") else {
        return sheet_url.to_string();
    };
    let Some(captures) = id_re.captures(sheet_url) else {
        return sheet_url.to_string();
    };
    let id = &captures[1];

    let gid = Regex::new(r"[#&?]gid=(\d+)")
        .ok()
        .and_then(|re| re.captures(sheet_url).map(|c| c[1].to_string()))
        .unwrap_or_else(|| "0".to_string());

    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        id, gid
    )
}

fn parse_attendees(content: &str) -> Result<Vec<AttendeeRecord>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::ParseFailed { source: Box::new(e) })?
        .clone();

    let mut attendees = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| SourceError::ParseFailed { source: Box::new(e) })?;
        // 表头占第 1 行，数据从第 2 行开始
        attendees.push(map_row_to_attendee(&headers, &row, i + 2));
    }
    Ok(attendees)
}

fn map_row_to_attendee(
    headers: &StringRecord,
    row: &StringRecord,
    row_index: usize,
) -> AttendeeRecord {
    let first_name = pick_field(headers, row, FIRST_NAME_COLUMNS).unwrap_or_default();
    let last_name = pick_field(headers, row, LAST_NAME_COLUMNS).unwrap_or_default();
    let email = pick_field(headers, row, EMAIL_COLUMNS).unwrap_or_default();
    let checked_in_raw = pick_field(headers, row, CHECKED_IN_COLUMNS);
    let checked_in = normalize_boolean(checked_in_raw.as_deref());

    debug!(
        "第 {} 行: {} {} ({}) - 签到原始值: {:?} -> {}",
        row_index, first_name, last_name, email, checked_in_raw, checked_in
    );

    AttendeeRecord {
        first_name,
        last_name,
        email,
        checked_in,
        row_index: Some(row_index),
    }
}

/// 按同义词顺序找第一个有非空值的列
fn pick_field(headers: &StringRecord, row: &StringRecord, synonyms: &[&str]) -> Option<String> {
    for name in synonyms {
        if let Some(idx) = headers.iter().position(|h| h == *name) {
            if let Some(value) = row.get(idx) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// 把签到列的取值归一化成布尔值
fn normalize_boolean(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => TRUTHY.contains(value.trim().to_lowercase().as_str()),
        None => false,
    }
}
