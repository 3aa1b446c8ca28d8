// Two security tiers: public (no auth) and protected (bearer token + role)
pub mod protected;
pub mod public;
