/// Policy selecting which declared fields of a message are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Visit only fields that are populated according to the message's own
    /// presence semantics (default).
    #[default]
    PopulatedOnly,
    /// Visit every declared field.
    ///
    /// Scalars are written even at their default value and repeated fields
    /// always produce a (possibly empty) list. A sub-message field that is not
    /// set is still skipped.
    EmitDefaults,
}

/// Immutable configuration threaded through every marshal call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarshalConfig {
    pub field_policy: FieldPolicy,
    /// Prefix used to synthesize a name for an enum number that has no
    /// declared value, e.g. `"_UNKNOWN_ENUM_ID_"` gives `"_UNKNOWN_ENUM_ID_4"`.
    ///
    /// When empty, the name of the value numbered 0 is used instead.
    pub unknown_enum_prefix: String,
}

impl MarshalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_policy(mut self, field_policy: FieldPolicy) -> Self {
        self.field_policy = field_policy;
        self
    }

    /// Shorthand for [`FieldPolicy::EmitDefaults`] / [`FieldPolicy::PopulatedOnly`].
    pub fn with_emit_defaults(self, emit_defaults: bool) -> Self {
        self.with_field_policy(if emit_defaults {
            FieldPolicy::EmitDefaults
        } else {
            FieldPolicy::PopulatedOnly
        })
    }

    pub fn with_unknown_enum_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unknown_enum_prefix = prefix.into();
        self
    }

    pub fn emit_defaults(&self) -> bool {
        self.field_policy == FieldPolicy::EmitDefaults
    }
}
