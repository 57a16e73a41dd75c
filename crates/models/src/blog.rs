use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Blog id. Allocated by the store, starts at 1, never reused.
pub type BlogId = u64;

/// A stored blog record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: BlogId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// 创建输入：只包含正文，id 与创建时间由存储层生成
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlog {
    pub content: String,
}

/// Reject blank content and content longer than `max_len` characters.
///
/// Length is counted in Unicode scalar values so multi-byte text is not
/// penalised. Content is never trimmed or otherwise rewritten.
pub fn validate_content(content: &str, max_len: usize) -> Result<(), ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("content must not be empty".into()));
    }
    let len = content.chars().count();
    if len > max_len {
        return Err(ModelError::Validation(format!(
            "content too long: {len} characters (max {max_len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_rejected() {
        assert!(validate_content("", 10).is_err());
        assert!(validate_content("   \n\t", 10).is_err());
    }

    #[test]
    fn length_limit_counts_chars() {
        assert!(validate_content("hello", 5).is_ok());
        assert!(validate_content("hello!", 5).is_err());
        // 5 个汉字，15 字节
        assert!(validate_content("你好世界啊", 5).is_ok());
    }

    #[test]
    fn too_long_message_mentions_limit() {
        let err = validate_content("abcdef", 3).unwrap_err();
        assert_eq!(
            err,
            ModelError::Validation("content too long: 6 characters (max 3)".into())
        );
    }

    #[test]
    fn blog_json_uses_camel_case() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let blog = Blog { id: 7, content: "hi".into(), created_at };
        let v = serde_json::to_value(&blog).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["content"], "hi");
        assert_eq!(v["createdAt"], "2024-05-01T10:00:00Z");
        assert!(v.get("created_at").is_none());
    }
}
