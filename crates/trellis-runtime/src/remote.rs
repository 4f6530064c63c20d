//! Remote-call marshalling glue
//!
//! The transport lives behind the [`RemoteProxy`] trait; this module only
//! serializes the argument tuple and tags the call with the fixed signature
//! the proxy expects.

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use crate::value::Value;

/// Signature tag identifying the argument-tuple shape of every remote call.
pub const REMOTE_CALL_SIGNATURE: &str = "java.lang.String, scala.Product";

/// External proxy that physically performs a remote invocation.
///
/// `payload` is the wire document produced by [`Runtime::serialize`]; the
/// reply is returned as wire text and decoding it is the caller's concern.
pub trait RemoteProxy {
    /// Perform the remote call.
    fn invoke(
        &self,
        method_name: &str,
        payload: &str,
        signature: &str,
    ) -> Result<String, RuntimeError>;
}

impl Runtime {
    /// Serialize `args` and delegate the call to the proxy.
    pub fn invoke_remote(
        &self,
        proxy: &dyn RemoteProxy,
        method_name: &str,
        args: &[Value],
    ) -> Result<String, RuntimeError> {
        let payload = self.serialize(&Value::Array(args.to_vec()))?;
        proxy.invoke(method_name, &payload, REMOTE_CALL_SIGNATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingProxy {
        calls: RefCell<Vec<(String, String, String)>>,
    }

    impl RemoteProxy for RecordingProxy {
        fn invoke(
            &self,
            method_name: &str,
            payload: &str,
            signature: &str,
        ) -> Result<String, RuntimeError> {
            self.calls.borrow_mut().push((
                method_name.to_string(),
                payload.to_string(),
                signature.to_string(),
            ));
            Ok("{\"$value\":null,\"$objects\":[]}".to_string())
        }
    }

    #[test]
    fn test_invoke_remote_marshals_and_tags() {
        let rt = Runtime::new().unwrap();
        let proxy = RecordingProxy {
            calls: RefCell::new(Vec::new()),
        };

        let reply = rt
            .invoke_remote(&proxy, "api.Service.ping", &[Value::Number(1.0)])
            .unwrap();
        assert!(reply.contains("$value"));

        let calls = proxy.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (method, payload, signature) = &calls[0];
        assert_eq!(method, "api.Service.ping");
        assert_eq!(signature, REMOTE_CALL_SIGNATURE);

        let doc: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(doc["$value"], serde_json::json!([1.0]));
    }
}
