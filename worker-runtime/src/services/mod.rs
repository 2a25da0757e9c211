pub mod scoped_writer;
