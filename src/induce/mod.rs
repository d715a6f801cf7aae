//! Secondary-reason induction.
//!
//! Before valuation, the reasons registered by the analysers are widened:
//! points that attack or defend are re-read to find further tactical
//! effects, owl critical dragons get their strategic reasons upgraded to
//! owl reasons, and captures and rescues induce connection and cut reasons
//! between the surrounding dragons.

mod owl;
mod secondary;
mod tactical;
