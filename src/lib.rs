// Purpose: Define crate-level module surface for the source-reduction pass library.
// Inputs/Outputs: Exposes the declaration-tree facade, rewriter interface, and passes.
// Invariants: Public module boundaries should remain stable for internal callers.
// Gotchas: Keep module wiring consistent with the pass registry in src/passes/mod.rs.

pub mod passes;
pub mod rewrite;
pub mod tree;
