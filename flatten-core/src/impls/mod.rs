mod list;
mod scalar;
mod tuple;
