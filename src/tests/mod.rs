mod low_level;
mod stability;
