//! Logic-context side of the stack.
//!
//! # Responsibility
//! - Consume engine events off the render loop.
//! - Forward accepted items and prefetch hints to external collaborators.
//!
//! # See also
//! - `crate::stack::events`

pub mod session;
