// Span tokenizer.
//
// Splits text the way the lemmatization pipeline expects: word runs,
// clitics ("n't", "'s") split from their host word, each punctuation
// character on its own, and whitespace runs minus their separating spaces.
// A lone space between words vanishes; any extra spaces, tabs or newlines
// become a whitespace token ("a  b" → "a", " ", "b"). Offsets are character
// offsets, which is what MMIF `start`/`end` refer to.

/// A token and its character span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Offset of the first character
    pub start: usize,
    /// Offset one past the last character
    pub end: usize,
}

impl Token {
    fn new(chars: &[char], start: usize, end: usize) -> Self {
        Self {
            text: chars[start..end].iter().collect(),
            start,
            end,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    pub fn is_word(&self) -> bool {
        self.text.chars().any(is_word_char)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '’'
}

/// Tokenize `text` into spans.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            let start = i;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            push_whitespace(&chars, start, i, &mut tokens);
        } else if is_word_char(c) {
            let start = i;
            while i < chars.len() {
                if is_word_char(chars[i]) {
                    i += 1;
                } else if is_apostrophe(chars[i])
                    && i + 1 < chars.len()
                    && chars[i + 1].is_alphabetic()
                {
                    i += 1;
                } else {
                    break;
                }
            }
            push_word(&chars, start, i, &mut tokens);
        } else {
            tokens.push(Token::new(&chars, i, i + 1));
            i += 1;
        }
    }

    tokens
}

/// One leading space separates the previous token; anything beyond it is
/// significant whitespace. A trailing space after significant whitespace
/// separates the next token.
fn push_whitespace(chars: &[char], start: usize, end: usize, tokens: &mut Vec<Token>) {
    let mut start = start;
    let mut end = end;
    if chars[start] == ' ' && start > 0 {
        start += 1;
    }
    if end - start > 1 && chars[end - 1] == ' ' {
        end -= 1;
    }
    if start < end {
        tokens.push(Token::new(chars, start, end));
    }
}

/// Split contractions: "don't" → "do" + "n't", "it's" → "it" + "'s".
fn push_word(chars: &[char], start: usize, end: usize, tokens: &mut Vec<Token>) {
    let Some(apostrophe) = (start..end).find(|&i| is_apostrophe(chars[i])) else {
        tokens.push(Token::new(chars, start, end));
        return;
    };

    let negation = apostrophe > start + 1
        && chars[apostrophe - 1].eq_ignore_ascii_case(&'n')
        && end - apostrophe == 2
        && chars[apostrophe + 1].eq_ignore_ascii_case(&'t');
    let split = if negation { apostrophe - 1 } else { apostrophe };

    if split > start {
        tokens.push(Token::new(chars, start, split));
    }
    tokens.push(Token::new(chars, split, end));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(texts("Hello, world!"), vec!["Hello", ",", "world", "!"]);
    }

    #[test]
    fn test_contractions() {
        assert_eq!(texts("I don't know"), vec!["I", "do", "n't", "know"]);
        assert_eq!(texts("it's fine"), vec!["it", "'s", "fine"]);
    }

    #[test]
    fn test_paragraph_break_is_a_token() {
        assert_eq!(texts("one \n\n two"), vec!["one", "\n\n", "two"]);
        assert_eq!(texts("one\n\ntwo"), vec!["one", "\n\n", "two"]);
    }

    #[test]
    fn test_double_space_keeps_one_space_token() {
        assert_eq!(texts("a  b"), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_single_space_vanishes_but_tab_stays() {
        assert_eq!(texts("a b"), vec!["a", "b"]);
        assert_eq!(texts("a\tb"), vec!["a", "\t", "b"]);
        assert_eq!(texts("a   b"), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let tokens = tokenize("café au lait");
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(tokens[1].start, 5);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let tokens = tokenize("  word");
        assert_eq!(tokens[0].text, " ");
        assert_eq!(tokens[1].start, 2);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
    }
}
