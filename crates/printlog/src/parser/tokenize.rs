/// Splits a log line into whitespace-separated tokens.
///
/// A double quote starts a quoted section that runs to the next double
/// quote, so `"my report.pdf"` is a single token and `""` is an empty one.
/// An unterminated quote runs to the end of the line. A line wrapped as a
/// whole in one pair of quotes is unwrapped first.
pub fn tokenize(line: &str) -> Vec<String> {
    let line = unwrap_line(line.trim());

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}

fn unwrap_line(line: &str) -> &str {
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        let inner = &line[1..line.len() - 1];
        if !inner.contains('"') {
            return inner;
        }
    }
    line
}
