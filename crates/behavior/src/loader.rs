// SPDX-License-Identifier: MIT

//! Resolves a type name to a running behavior instance, checking its
//! declared arity against `InputVars`.

use crate::behavior::Behavior;
use crate::error::BehaviorLoadError;
use crate::registry::BehaviorRegistry;

pub struct BehaviorLoader<'a> {
    registry: &'a BehaviorRegistry,
}

impl<'a> BehaviorLoader<'a> {
    pub fn new(registry: &'a BehaviorRegistry) -> Self {
        Self { registry }
    }

    /// Construct the behavior for `type_name`, warning (not failing) if its
    /// declared `input_names()` don't match `input_var_names` in arity or
    /// naming. Fails with `BehaviorLoadError` only when no factory is
    /// registered for the type at all.
    pub fn load(
        &self,
        type_name: &str,
        input_var_names: &[String],
    ) -> Result<Box<dyn Behavior>, BehaviorLoadError> {
        let behavior = self
            .registry
            .construct(type_name)
            .ok_or_else(|| BehaviorLoadError::UnknownType(type_name.to_string()))?;

        check_arity(type_name, behavior.as_ref(), input_var_names);
        Ok(behavior)
    }
}

fn check_arity(type_name: &str, behavior: &dyn Behavior, input_var_names: &[String]) {
    let declared = behavior.input_names();
    if declared.len() != input_var_names.len() {
        tracing::warn!(
            fb_type = type_name,
            declared = declared.len(),
            expected = input_var_names.len(),
            "behavior arity does not match InputVars count"
        );
        return;
    }
    for (got, want) in declared.iter().zip(input_var_names.iter()) {
        if got != want {
            tracing::warn!(
                fb_type = type_name,
                declared = got,
                expected = want,
                "behavior input name does not match InputVars declaration"
            );
        }
    }
}
