//! Edge case tests for textkv-lex
