//! Typed reference definitions for runtime objects.

use crate::define_ref;

// =============================================================================
// Runtime Objects
// =============================================================================

define_ref!(ContainerId);
define_ref!(ImageId);

// =============================================================================
// Tests
// =============================================================================
