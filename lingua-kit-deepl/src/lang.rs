/// Normalizes an ISO language code to DeepL's dialect-qualified form.
///
/// DeepL rejects the bare `EN`/`PT` target codes and wants uppercase
/// everywhere.
pub fn to_deepl_lang(code: &str) -> String {
    match code.to_ascii_lowercase().as_str() {
        "en" => "EN-US".to_string(),
        "pt" => "PT-BR".to_string(),
        "zh" | "zh-cn" => "ZH".to_string(),
        other => other.to_ascii_uppercase(),
    }
}
