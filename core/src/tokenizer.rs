/// Whitespace as classified by C `isspace`, which also counts vertical tab.
#[inline]
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0B
}

/// Consume the run starting at `start` whose bytes satisfy `pred`, returning its end.
#[inline]
fn run_end(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

/// Tokenize text into uppercased letter runs, digit runs, and single symbol bytes.
///
/// Non-ASCII bytes are dropped one by one (and so split a surrounding letter run),
/// whitespace is skipped, and every other byte becomes its own one-character token.
pub fn tokenize(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii() || is_space(b) {
            i += 1;
        } else if b.is_ascii_alphabetic() {
            let end = run_end(bytes, i, |c| c.is_ascii_alphabetic());
            tokens.push(text[i..end].to_ascii_uppercase());
            i = end;
        } else if b.is_ascii_digit() {
            let end = run_end(bytes, i, |c| c.is_ascii_digit());
            tokens.push(text[i..end].to_string());
            i = end;
        } else {
            tokens.push(char::from(b).to_string());
            i += 1;
        }
    }
    tokens
}
