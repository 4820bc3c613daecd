use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::ServiceAccountKey;
use crate::error::AppError;

pub const REQUIRED_FIELDS: [&str; 7] = [
    "searchstring",
    "bearertoken",
    "projectid",
    "location",
    "gcpkey",
    "maxsearchreturns",
    "outputfile",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetsLangRequest {
    pub bearertoken: String,
    pub projectid: String,
    pub location: String,
    pub searchstring: String,
    pub maxsearchreturns: u32,
    pub outputfile: String,
    pub gcpkey: ServiceAccountKey,
}

impl TweetsLangRequest {
    /// Parses and checks a raw request body. Every required field must be
    /// present before any of them is interpreted.
    pub fn from_body(body: &[u8]) -> Result<TweetsLangRequest, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidBody(format!("body is not valid JSON: {e}")))?;

        let Value::Object(fields) = &value else {
            return Err(AppError::InvalidBody(
                "body must be a JSON object".to_string(),
            ));
        };

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|key| !fields.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_body() -> Value {
        json!({
            "bearertoken": "t",
            "projectid": "p",
            "location": "global",
            "searchstring": "foo",
            "maxsearchreturns": 10,
            "outputfile": "/tmp/o.json",
            "gcpkey": {
                "type": "service_account",
                "project_id": "p",
                "private_key_id": "k",
                "private_key": "pem",
                "client_email": "sa@p.iam.gserviceaccount.com",
                "client_id": "1",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
                "client_x509_cert_url": "https://www.googleapis.com/robot/v1/metadata/x509/sa"
            }
        })
    }

    #[test]
    fn test_full_request_parses() {
        let body = serde_json::to_vec(&full_body()).unwrap();
        let request = TweetsLangRequest::from_body(&body).unwrap();
        assert_eq!(request.searchstring, "foo");
        assert_eq!(request.maxsearchreturns, 10);
        assert_eq!(request.gcpkey.key_type, "service_account");
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        for field in REQUIRED_FIELDS {
            let mut body = full_body();
            body.as_object_mut().unwrap().remove(field);
            let body = serde_json::to_vec(&body).unwrap();
            match TweetsLangRequest::from_body(&body) {
                Err(AppError::MissingFields(missing)) => assert_eq!(missing, vec![field]),
                other => panic!("expected missing {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_type_is_invalid_body() {
        let mut body = full_body();
        body["maxsearchreturns"] = json!("ten");
        let body = serde_json::to_vec(&body).unwrap();
        assert!(matches!(
            TweetsLangRequest::from_body(&body),
            Err(AppError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_incomplete_gcpkey_is_invalid_body() {
        let mut body = full_body();
        body["gcpkey"].as_object_mut().unwrap().remove("private_key");
        let body = serde_json::to_vec(&body).unwrap();
        let err = TweetsLangRequest::from_body(&body).unwrap_err();
        assert!(err.to_string().contains("private_key"));
    }

    #[test]
    fn test_non_object_and_garbage_bodies() {
        assert!(matches!(
            TweetsLangRequest::from_body(b"[1,2,3]"),
            Err(AppError::InvalidBody(_))
        ));
        assert!(matches!(
            TweetsLangRequest::from_body(b"not json"),
            Err(AppError::InvalidBody(_))
        ));
    }
}
