use consensus_core::DecisionId;

/// Address that opens `id`: `<base>?id=<id>`.
pub fn share_link(base: &str, id: &DecisionId) -> String {
    let base = base.trim();
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}id={}", base, separator, urlencoding::encode(id.as_str()))
}

/// Extract a decision id from a bare id or from any address carrying an
/// `id` query parameter.
pub fn parse_share_link(text: &str) -> Option<DecisionId> {
    let text = text.trim();
    if let Ok(id) = DecisionId::parse(text) {
        return Some(id);
    }
    let (_, query) = text.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .and_then(|value| DecisionId::parse(&value).ok())
}
