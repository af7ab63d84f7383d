pub(crate) mod google;

use futures::Stream;
use std::pin::Pin;

/// Type alias for a stream of generated plan text fragments.
///
/// Fragments arrive in generation order and concatenate to the serialized
/// plan object. The stream is pinned and boxed so the handler can forward
/// it without knowing the provider's concrete stream type.
pub(crate) type PlanStream = Pin<Box<dyn Stream<Item = crate::Result<String>> + Send>>;
