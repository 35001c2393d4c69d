/// Cut an upstream error body down to at most `max` bytes without
/// splitting a character
pub fn truncate_body(body: &str, max: usize) -> &str {
    let body = body.trim();
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
