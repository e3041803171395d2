use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client-side encrypted envelope. The server never decrypts or inspects these strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedPayload {
    pub ct: String,
    pub iv: String,
    pub ek: String,
}

/// Paste body: plain text, an encrypted envelope, or any other JSON object.
///
/// Objects carrying fields beyond `ct`/`iv`/`ek` fall through to `Object` so nothing the
/// client sent is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PasteContent {
    Text(String),
    Encrypted(EncryptedPayload),
    Object(Map<String, Value>),
}

/// Single-request paste creation body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPaste {
    pub content: PasteContent,
    pub is_encrypted: bool,
    #[serde(default)]
    pub remark: String,
}

impl NewPaste {
    /// Caller-owned record fields; `id` and `timestamp` are added by the server.
    pub fn into_fields(self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = Map::new();
        fields.insert("is_encrypted".to_string(), Value::Bool(self.is_encrypted));
        fields.insert("remark".to_string(), Value::String(self.remark));
        fields.insert("content".to_string(), serde_json::to_value(self.content)?);
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_variants_are_distinguished() {
        let text: PasteContent = serde_json::from_value(json!("hello")).unwrap();
        assert_eq!(text, PasteContent::Text("hello".to_string()));

        let envelope: PasteContent =
            serde_json::from_value(json!({"ct": "Y3Q=", "iv": "aXY=", "ek": "ZWs="})).unwrap();
        assert!(matches!(envelope, PasteContent::Encrypted(_)));

        let object: PasteContent =
            serde_json::from_value(json!({"ct": "Y3Q=", "iv": "aXY=", "ek": "ZWs=", "alg": "x"}))
                .unwrap();
        match object {
            PasteContent::Object(map) => assert_eq!(map["alg"], json!("x")),
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn remark_defaults_to_empty() {
        let paste: NewPaste =
            serde_json::from_value(json!({"content": "hi", "is_encrypted": false})).unwrap();
        assert_eq!(paste.remark, "");
    }

    #[test]
    fn missing_required_fields_fail() {
        assert!(serde_json::from_value::<NewPaste>(json!({"content": "hi"})).is_err());
        assert!(serde_json::from_value::<NewPaste>(json!({"is_encrypted": true})).is_err());
        assert!(
            serde_json::from_value::<NewPaste>(json!({"content": null, "is_encrypted": true}))
                .is_err()
        );
    }

    #[test]
    fn into_fields_keeps_envelope_shape() {
        let paste = NewPaste {
            content: PasteContent::Encrypted(EncryptedPayload {
                ct: "c".to_string(),
                iv: "i".to_string(),
                ek: "e".to_string(),
            }),
            is_encrypted: true,
            remark: "note".to_string(),
        };
        let fields = paste.into_fields().unwrap();
        assert_eq!(fields["content"], json!({"ct": "c", "iv": "i", "ek": "e"}));
        assert_eq!(fields["is_encrypted"], json!(true));
        assert_eq!(fields["remark"], json!("note"));
    }
}
