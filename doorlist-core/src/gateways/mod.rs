pub mod city;
pub mod geocode;
