mod repositories;
mod supabase_todo_store;

pub use repositories::InMemoryJobRepository;
pub use supabase_todo_store::SupabaseTodoStore;
