mod blocking;
mod invariants;
mod process_logic;
