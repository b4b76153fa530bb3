pub mod knowledge_fixture;
