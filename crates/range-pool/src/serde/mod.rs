mod limit;
mod pool;
