use serde::{Deserialize, Serialize};

use crate::models::LineRange;

/// Messages a source viewer subscribes to. Serialised as `{"type": "highlight", ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewerCommand {
    #[serde(rename_all = "camelCase")]
    Highlight { start_line: u32, end_line: u32 },
    Scroll { offset: u32 },
    Clear,
}

impl ViewerCommand {
    pub fn highlight(range: LineRange) -> Self {
        ViewerCommand::Highlight {
            start_line: range.start_line,
            end_line: range.end_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_wire_shape() {
        let cmd = ViewerCommand::highlight(LineRange::new_unchecked(3, 5));
        assert_eq!(
            serde_json::to_value(cmd).unwrap(),
            serde_json::json!({ "type": "highlight", "startLine": 3, "endLine": 5 })
        );
        assert_eq!(
            serde_json::to_value(ViewerCommand::Clear).unwrap(),
            serde_json::json!({ "type": "clear" })
        );
    }
}
