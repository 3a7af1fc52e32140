pub mod profile11;
