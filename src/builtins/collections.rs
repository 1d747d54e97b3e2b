//! Constructors for the two aggregate mutable kinds: `array` and `dict`.
//! Indexed access lives in `refs` alongside `get`/`set!`; the `<kind>?`
//! predicates live in `types`.

use std::collections::HashMap;

use crate::error::RagnarokError;
use crate::value::Value;

use super::primitive;

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "array".to_string(),
        primitive("array", 0, None, |_name, args, _ctx| Ok(Value::array(args.to_vec()))),
    );

    bindings.insert(
        "dict".to_string(),
        primitive("dict", 0, None, |name, args, _ctx| {
            let mut entries = HashMap::new();
            for arg in args {
                let pair = arg.to_vec().ok_or_else(|| RagnarokError::MalformedList(name.to_string()))?;
                if pair.len() != 2 {
                    return Err(RagnarokError::MalformedList(name.to_string()));
                }
                let key = &pair[0];
                if !key.is_symbol() {
                    return Err(RagnarokError::wrong_type(name, key.kind_name()));
                }
                entries.insert(key.as_str().to_string(), pair[1].clone());
            }
            Ok(Value::dict(entries))
        }),
    );
}
