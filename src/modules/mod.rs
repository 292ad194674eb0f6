// Module exports for pure logic
pub mod navigation;
pub mod tabs;                // Tab strip bookkeeping
