use crate::errors::{Error, ErrorCode, Result};
use crate::tokenizers::{QuoteState, Scanner, Token, TokenType, Tokenizer, TokenizerState};

/// Reads a string delimited by the character it starts with.
///
/// A doubled quote inside the string stands for one literal quote. The token
/// value keeps the raw text, quotes included; the tokenizer decodes it when
/// `decode_strings` is on.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericQuoteState;

impl GenericQuoteState {
    pub fn new() -> Self {
        GenericQuoteState
    }
}

/// Reads a quoted string and returns its raw text, quotes included.
///
/// Fails with `UNEXPECTED_END` at the opening quote when the string is not
/// terminated.
pub(crate) fn read_quoted(scanner: &mut Scanner) -> Result<String> {
    let (line, column) = (scanner.peek_line(), scanner.peek_column());
    let Some(quote) = scanner.read() else {
        return Err(Error::at(ErrorCode::UnexpectedEnd, "Unexpected end of input", line, column));
    };

    let mut value = String::from(quote);
    loop {
        match scanner.read() {
            Some(ch) if ch == quote => {
                value.push(ch);
                if scanner.peek() == Some(quote) {
                    scanner.read();
                    value.push(quote);
                } else {
                    return Ok(value);
                }
            }
            Some(ch) => value.push(ch),
            None => {
                return Err(Error::at(
                    ErrorCode::UnexpectedEnd,
                    format!("Unterminated string starting with {}", quote),
                    line,
                    column,
                ));
            }
        }
    }
}

impl TokenizerState for GenericQuoteState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let value = read_quoted(scanner)?;
        Ok(Token::new(TokenType::Quoted, value, line, column))
    }
}

impl QuoteState for GenericQuoteState {
    fn encode_string(&self, value: &str, quote: char) -> String {
        let doubled: String = [quote, quote].iter().collect();
        format!("{}{}{}", quote, value.replace(quote, &doubled), quote)
    }

    fn decode_string(&self, value: &str, quote: char) -> String {
        let mut chars = value.chars();
        let quoted = value.chars().count() >= 2
            && chars.next() == Some(quote)
            && chars.next_back() == Some(quote);
        if !quoted {
            return value.to_string();
        }

        let doubled: String = [quote, quote].iter().collect();
        chars.as_str().replace(&doubled, &quote.to_string())
    }
}
