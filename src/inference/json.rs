/// 从模型输出中取出 JSON 对象，容忍 markdown 代码块和前后说明文字
pub fn extract_json(text: &str) -> Option<&str> {
    let mut text = text.trim();

    // ```json ... ``` 包裹
    if let Some(rest) = text.strip_prefix("```") {
        if let Some(newline) = rest.find('\n') {
            let body = &rest[newline + 1..];
            if let Some(end) = body.rfind("```") {
                text = body[..end].trim();
            }
        }
    }

    // 从每个 '{' 开始尝试，取第一个完整的 JSON 对象
    for (start, _) in text.match_indices('{') {
        let candidate = &text[start..];
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
        if let Some(Ok(serde_json::Value::Object(_))) = stream.next() {
            return Some(&candidate[..stream.byte_offset()]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_object() {
        assert_eq!(extract_json(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn fenced_object() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn object_inside_prose() {
        let text = "Sure! Here is the data: {\"a\": {\"b\": 2}} Let me know.";
        assert_eq!(extract_json(text), Some(r#"{"a": {"b": 2}}"#));
    }

    #[test]
    fn braces_in_surrounding_prose() {
        let text = "Totals {approx} below: {\"a\": {\"b\": 2}} (see footnote})";
        assert_eq!(extract_json(text), Some(r#"{"a": {"b": 2}}"#));
    }

    #[test]
    fn braces_inside_strings() {
        let text = r#"Result: {"label": "Fee }{ x", "amount": 1}"#;
        assert_eq!(extract_json(text), Some(r#"{"label": "Fee }{ x", "amount": 1}"#));
    }

    #[test]
    fn no_object() {
        assert_eq!(extract_json("sorry, unreadable"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }
}
