pub mod layout;
pub mod controls;
pub mod readout;
pub mod atwood_vis2d;
pub mod headless;
