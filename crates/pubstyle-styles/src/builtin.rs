//! Styles shipped with the service.

use crate::error::StyleError;
use crate::style::StyleDefinition;

/// Built-in style documents in registration order.
const BUILTIN_STYLES: [(&str, &str); 3] = [
    ("ieee", include_str!("../styles/ieee.json")),
    ("nature", include_str!("../styles/nature.json")),
    ("apa", include_str!("../styles/apa.json")),
];

/// Parse the embedded style documents.
pub(crate) fn builtin_styles() -> Result<Vec<StyleDefinition>, StyleError> {
    BUILTIN_STYLES
        .iter()
        .map(|(key, source)| {
            let mut style: StyleDefinition =
                serde_json::from_str(source).map_err(|e| StyleError::Parse {
                    origin: (*key).to_owned(),
                    source: e,
                })?;
            style.key = (*key).to_owned();
            Ok(style)
        })
        .collect()
}
