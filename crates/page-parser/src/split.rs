//! Splitting on alternative literal delimiters.

/// Splits `input` on any of `delimiters`, keeping empty tokens.
///
/// At each position the earliest-starting delimiter wins; when two start at
/// the same byte the one listed first is used. This is the behaviour of a
/// regex alternation such as `<td>|</td>`.
pub fn split_any<'a>(input: &'a str, delimiters: &[&str]) -> Vec<&'a str> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        let next = delimiters
            .iter()
            .filter(|delim| !delim.is_empty())
            .filter_map(|delim| rest.find(delim).map(|pos| (pos, delim.len())))
            .min_by_key(|(pos, _)| *pos);

        match next {
            Some((pos, len)) => {
                tokens.push(&rest[..pos]);
                rest = &rest[pos + len..];
            }
            None => {
                tokens.push(rest);
                return tokens;
            }
        }
    }
}
