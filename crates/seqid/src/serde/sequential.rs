use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{SequentialId, split_suffix};

impl Serialize for SequentialId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

/// Deserializes from the rendered form. Everything before the trailing digit
/// run is taken as the prefix.
///
/// Non-canonical widths are accepted and normalised, so `"A7"` deserializes
/// to the same value as `"A0007"`.
impl<'de> Deserialize<'de> for SequentialId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
        let (prefix, _) = split_suffix(&s)
            .ok_or_else(|| de::Error::custom(format!("`{s}` has no numeric suffix")))?;
        SequentialId::parse(prefix, &s)
            .ok_or_else(|| de::Error::custom(format!("`{s}` has a suffix wider than u64")))
    }
}
