mod patches;
mod records;
