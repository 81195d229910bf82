//! Dump parsed Mustache templates as JSON

use serde_json::{Map, Value, json};

use crate::mustache::{MustacheParser, MustacheToken};

use super::CliError;

/// Convert a template tree to JSON; children appear under `tokens`
pub fn template_to_json(tokens: &[MustacheToken]) -> Value {
    Value::Array(
        tokens
            .iter()
            .map(|token| {
                let mut node = Map::new();
                node.insert("type".into(), json!(token.token_type().name()));
                node.insert("value".into(), json!(token.value()));
                node.insert("line".into(), json!(token.line()));
                node.insert("column".into(), json!(token.column()));
                if !token.tokens().is_empty() {
                    node.insert("tokens".into(), template_to_json(token.tokens()));
                }
                Value::Object(node)
            })
            .collect(),
    )
}

/// Parse a template and return its tree and referenced variables
pub fn execute_template(template: &str) -> Result<Value, CliError> {
    let mut parser = MustacheParser::new();
    parser.parse_string(template)?;

    Ok(json!({
        "tokens": template_to_json(parser.result_tokens()),
        "variables": parser.variable_names(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_tree() {
        let output = execute_template("{{#a}}{{x}}{{/a}}").unwrap();
        assert_eq!(output["tokens"][0]["type"], "Section");
        assert_eq!(output["tokens"][0]["tokens"][0]["type"], "EscapedVariable");
        assert_eq!(output["tokens"][0]["tokens"][0]["value"], "x");
        assert_eq!(output["variables"], json!(["a", "x"]));
    }
}
