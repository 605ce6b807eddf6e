mod entries;
mod navigator;
