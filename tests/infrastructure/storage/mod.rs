mod azure_store_test;
