pub mod address_space;
pub mod raw_memory;
