pub mod match_record;
pub mod participant;
pub mod round;
pub mod score;
pub mod seed;
pub mod team;
pub mod tournament;
